use crate::call::Arg;

/// Label for the call site, suffixed with the trace id in parentheses.
///
/// Tried in order: the first argument's identity, the first argument's type
/// name, the callable's name, and finally `observe`.
pub fn resolve_identity(args: &[Arg<'_>], callable_name: Option<&str>, trace_id: &str) -> String {
    let label = match args.first() {
        Some(first) => first.identity().unwrap_or_else(|| first.type_name()),
        None => callable_name.unwrap_or("observe"),
    };
    format!("{label}({trace_id})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::Component;
    use serde_json::json;

    struct MainProcess;
    impl Component for MainProcess {}

    struct Named;
    impl Component for Named {
        fn identity(&self) -> Option<&str> {
            Some("Valheim")
        }
    }

    #[test]
    fn test_identity_default() {
        assert_eq!(resolve_identity(&[], None, "abcd"), "observe(abcd)");
    }

    #[test]
    fn test_identity_from_function() {
        assert_eq!(
            resolve_identity(&[], Some("process_function"), ""),
            "process_function()"
        );
    }

    #[test]
    fn test_identity_from_type() {
        let args = [Arg::component(&MainProcess)];
        assert_eq!(resolve_identity(&args, None, ""), "MainProcess()");
        assert_eq!(resolve_identity(&args, Some("start"), "t-1"), "MainProcess(t-1)");
    }

    #[test]
    fn test_identity_from_component_identity() {
        let args = [Arg::component(&Named)];
        assert_eq!(resolve_identity(&args, None, ""), "Valheim()");
    }

    #[test]
    fn test_identity_from_plain_value() {
        let value = json!(42);
        let args = [Arg::Value(&value), Arg::component(&Named)];
        assert_eq!(resolve_identity(&args, Some("f"), "x"), "number(x)");
    }
}
