//! Typed layered merge.
//!
//! Layers are merged lowest priority first: `base.merge(higher)`.

use serde_json::{Map, Value};

use crate::config::{BundlerConfig, NextConfig, OutConfig};

pub trait Merge {
    /// Fold `other` into `self`; values present in `other` win.
    fn merge(&mut self, other: Self);
}

impl<T> Merge for Option<T> {
    fn merge(&mut self, other: Self) {
        if other.is_some() {
            *self = other;
        }
    }
}

impl<T> Merge for Vec<T> {
    fn merge(&mut self, other: Self) {
        self.extend(other);
    }
}

impl Merge for Map<String, Value> {
    fn merge(&mut self, other: Self) {
        for (key, value) in other {
            match self.get_mut(&key) {
                Some(existing) => merge_values(existing, value),
                None => {
                    self.insert(key, value);
                }
            }
        }
    }
}

fn merge_values(target: &mut Value, update: Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => target_map.merge(update_map),
        (Value::Array(target_items), Value::Array(update_items)) => {
            target_items.extend(update_items)
        }
        (target_slot, update) => *target_slot = update,
    }
}

impl Merge for OutConfig {
    fn merge(&mut self, other: Self) {
        self.dir.merge(other.dir);
        self.js.merge(other.js);
        self.sef.merge(other.sef);
    }
}

impl Merge for NextConfig {
    fn merge(&mut self, other: Self) {
        self.mode.merge(other.mode);
        self.log_level.merge(other.log_level);
        self.clear_screen.merge(other.clear_screen);
        self.watch.merge(other.watch);
    }
}

impl Merge for BundlerConfig {
    fn merge(&mut self, other: Self) {
        self.command.merge(other.command);
        self.args.merge(other.args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LogLevel;
    use serde_json::json;

    #[test]
    fn later_some_replaces_earlier() {
        let mut base = Some(1);
        base.merge(None);
        assert_eq!(base, Some(1));
        base.merge(Some(2));
        assert_eq!(base, Some(2));
    }

    #[test]
    fn nested_blocks_merge_field_wise() {
        let mut next = NextConfig {
            log_level: Some(LogLevel::Info),
            clear_screen: Some(true),
            ..Default::default()
        };
        next.merge(NextConfig {
            log_level: Some(LogLevel::Warn),
            ..Default::default()
        });
        assert_eq!(next.log_level, Some(LogLevel::Warn));
        assert_eq!(next.clear_screen, Some(true));
    }

    #[test]
    fn passthrough_maps_merge_deeply() {
        let mut base = json!({ "a": { "x": 1, "list": [1] }, "b": 1 })
            .as_object()
            .cloned()
            .unwrap();
        let update = json!({ "a": { "y": 2, "list": [2] }, "b": 2 })
            .as_object()
            .cloned()
            .unwrap();
        base.merge(update);
        assert_eq!(
            Value::Object(base),
            json!({ "a": { "x": 1, "list": [1, 2], "y": 2 }, "b": 2 })
        );
    }

    #[test]
    fn bundler_args_concatenate() {
        let mut bundler = BundlerConfig {
            command: Some("rolldown".into()),
            args: vec!["--sourcemap".into()],
        };
        bundler.merge(BundlerConfig {
            command: None,
            args: vec!["--verbose".into()],
        });
        assert_eq!(bundler.command.as_deref(), Some("rolldown"));
        assert_eq!(bundler.args, vec!["--sourcemap", "--verbose"]);
    }
}
