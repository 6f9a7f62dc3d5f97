/// Replace `${VAR}` placeholders with environment variable values.
///
/// Placeholders whose variable is unset, and malformed placeholders, are
/// left untouched so the parse error (if any) points at the original text.
pub fn substitute_env(input: &str) -> String {
    substitute_with(input, |name| std::env::var(name).ok())
}

fn substitute_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match lookup(name) {
                    Some(value) if !name.is_empty() => out.push_str(&value),
                    _ => {
                        out.push_str("${");
                        out.push_str(name);
                        out.push('}');
                    },
                }
                rest = &after[end + 1..];
            },
            None => {
                // Unterminated placeholder; keep the tail verbatim.
                out.push_str(&rest[start..]);
                rest = "";
            },
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "TOKEN" => Some("sk-abc".to_string()),
            "EMPTYOK" => Some(String::new()),
            _ => None,
        }
    }

    #[test]
    fn replaces_known_variable() {
        assert_eq!(
            substitute_with("api_key = \"${TOKEN}\"", lookup),
            "api_key = \"sk-abc\""
        );
    }

    #[test]
    fn keeps_unknown_variable() {
        assert_eq!(substitute_with("${MISSING}", lookup), "${MISSING}");
    }

    #[test]
    fn replaces_multiple_occurrences() {
        assert_eq!(
            substitute_with("${TOKEN} and ${TOKEN}", lookup),
            "sk-abc and sk-abc"
        );
    }

    #[test]
    fn unterminated_placeholder_is_literal() {
        assert_eq!(substitute_with("prefix ${TOKEN", lookup), "prefix ${TOKEN");
    }

    #[test]
    fn empty_value_is_substituted() {
        assert_eq!(substitute_with("[${EMPTYOK}]", lookup), "[]");
    }

    #[test]
    fn plain_text_untouched() {
        assert_eq!(substitute_with("no placeholders $HOME", lookup), "no placeholders $HOME");
    }
}
