//! SQL text helpers: identifier quoting and script splitting

/// Quote a SQL identifier, doubling embedded double quotes.
///
/// # Examples
/// ```
/// use bf_db::sql::quote_ident;
/// assert_eq!(quote_ident("users"), r#""users""#);
/// assert_eq!(quote_ident(r#"my"col"#), r#""my""col""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a possibly schema-qualified name component by component.
///
/// # Examples
/// ```
/// use bf_db::sql::quote_qualified;
/// assert_eq!(quote_qualified("bank.stg_terminals_temp"), r#""bank"."stg_terminals_temp""#);
/// ```
pub fn quote_qualified(name: &str) -> String {
    name.split('.')
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(".")
}

/// Split a qualified name into (schema, table); unqualified names live in `main`.
pub fn split_qualified_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) => (&name[..pos], &name[pos + 1..]),
        None => ("main", name),
    }
}

/// Split a SQL script into statements on `;`.
///
/// Semicolons inside single-quoted literals, double-quoted identifiers and
/// `--` line comments do not split. Statements consisting only of comments
/// and whitespace are dropped.
pub fn split_statements(script: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut has_code = false;
    let mut chars = script.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                has_code = true;
                current.push(c);
                // '' and "" escapes close and reopen the quote, which is
                // equivalent for splitting purposes.
                for inner in chars.by_ref() {
                    current.push(inner);
                    if inner == c {
                        break;
                    }
                }
            }
            '-' if chars.peek() == Some(&'-') => {
                for inner in chars.by_ref() {
                    if inner == '\n' {
                        current.push('\n');
                        break;
                    }
                }
            }
            ';' => {
                if has_code {
                    statements.push(current.trim().to_string());
                }
                current.clear();
                has_code = false;
            }
            _ => {
                if !c.is_whitespace() {
                    has_code = true;
                }
                current.push(c);
            }
        }
    }
    if has_code {
        statements.push(current.trim().to_string());
    }
    statements
}

#[cfg(test)]
#[path = "sql_test.rs"]
mod tests;
