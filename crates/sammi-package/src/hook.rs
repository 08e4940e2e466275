//! Command hook detection.
//!
//! A bundle exposes a command hook when its default export is a function. The
//! bundler compiles `export default fn` into an assignment on the IIFE's
//! namespace parameter, which is what the default detector looks for.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

/// Decides whether a bundled script needs an `[insert_command]` section.
pub trait CommandHookDetector {
    /// Never fails; an unrecognizable script is reported as having no hook.
    fn detects_command_hook(&self, script: &str) -> bool;
}

static NAMESPACE_IIFE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"SAMMIExtensions\s*\|\|\s*\{\}[;,]\n?\(function\((\w+)\)\s*\{")
        .expect("valid namespace pattern")
});

/// Matches the IIFE wrapper that extends `SAMMIExtensions`, then looks for
/// `<param>.default = <identifier>` anywhere after it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamespaceDefaultDetector;

impl CommandHookDetector for NamespaceDefaultDetector {
    fn detects_command_hook(&self, script: &str) -> bool {
        let Some(captures) = NAMESPACE_IIFE.captures(script) else {
            trace!("no namespace wrapper in bundle");
            return false;
        };
        let (Some(whole), Some(param)) = (captures.get(0), captures.get(1)) else {
            return false;
        };

        let pattern = format!(r"{}\.default\s*=\s*\w+", regex::escape(param.as_str()));
        match Regex::new(&pattern) {
            Ok(assignment) => assignment.is_match(&script[whole.end()..]),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WITH_HOOK: &str = r#"/* Demo v1.0.0 - Built with SAMMI Next v0.2.0 */
var SAMMIExtensions = SAMMIExtensions || {};
(function(exports) {
"use strict";
function main() {
	console.log("hello");
}
exports.default = main;
})(SAMMIExtensions.demo = SAMMIExtensions.demo || {});
"#;

    const WITHOUT_HOOK: &str = r#"var SAMMIExtensions = SAMMIExtensions || {};
(function(exports) {
"use strict";
const helper = () => 1;
exports.helper = helper;
})(SAMMIExtensions.demo = SAMMIExtensions.demo || {});
"#;

    #[test]
    fn detects_default_assignment() {
        assert!(NamespaceDefaultDetector.detects_command_hook(WITH_HOOK));
    }

    #[test]
    fn ignores_named_exports_only() {
        assert!(!NamespaceDefaultDetector.detects_command_hook(WITHOUT_HOOK));
    }

    #[test]
    fn minified_bundle_is_recognized() {
        let script = "var SAMMIExtensions=SAMMIExtensions||{},(function(e){function t(){}e.default=t})(SAMMIExtensions.demo=SAMMIExtensions.demo||{});";
        assert!(NamespaceDefaultDetector.detects_command_hook(script));
    }

    #[test]
    fn assignment_must_use_the_wrapper_parameter() {
        let script = "var SAMMIExtensions = SAMMIExtensions || {};\n(function(exports) {\nother.default = main;\n})({});";
        assert!(!NamespaceDefaultDetector.detects_command_hook(script));
    }

    #[test]
    fn unrelated_script_has_no_hook() {
        assert!(!NamespaceDefaultDetector.detects_command_hook("console.log(1)"));
        assert!(!NamespaceDefaultDetector.detects_command_hook(""));
    }
}
