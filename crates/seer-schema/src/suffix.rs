use seer_core::SchemaItem;

/// `{name}-{suffix}` for index 0, `{name}-{suffix}-{index}` afterwards.
#[must_use]
pub fn suffixed_name(name: &str, suffix: &str, index: u32) -> String {
    if index == 0 {
        format!("{name}-{suffix}")
    } else {
        format!("{name}-{suffix}-{index}")
    }
}

/// Suffixed name for `item`, built from its trimmed name.
#[must_use]
pub fn generate<T: SchemaItem>(item: &T, suffix: &str, index: u32) -> String {
    suffixed_name(item.key(), suffix, index)
}
