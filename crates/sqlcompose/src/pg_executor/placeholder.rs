//! Named (`:name`) to positional (`$n`) placeholder translation.

/// SQL rewritten for PostgreSQL plus the placeholder name behind each `$n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PositionalSql {
    pub sql: String,
    /// `names[k]` is bound to `$k+1`.
    pub names: Vec<String>,
}

/// Explicit conversion applied to one placeholder: `($k::from)::to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Cast {
    pub from: String,
    pub to: String,
}

/// Rewrite `:name` tokens into `$1, $2, ...` in order of first appearance.
///
/// A name used more than once maps to the same `$n`. `::` casts, text
/// inside single-quoted literals or double-quoted identifiers, and `--` /
/// `/* */` comments are left as is. Dollar-quoted bodies are not recognized.
pub(crate) fn to_positional(sql: &str) -> PositionalSql {
    rewrite(sql, &[])
}

/// Same as [`to_positional`], but `$k` is written as `($k::from)::to` when
/// `casts[k - 1]` is set.
pub(crate) fn to_positional_with_casts(sql: &str, casts: &[Option<Cast>]) -> PositionalSql {
    rewrite(sql, casts)
}

fn rewrite(sql: &str, casts: &[Option<Cast>]) -> PositionalSql {
    let mut out = String::with_capacity(sql.len());
    let mut names: Vec<String> = Vec::new();
    let mut quote: Option<char> = None;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' => {
                quote = Some(c);
                out.push(c);
            }
            '-' if chars.peek() == Some(&'-') => {
                out.push(c);
                for n in chars.by_ref() {
                    out.push(n);
                    if n == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                // Block comments nest in PostgreSQL.
                out.push(c);
                let mut depth = 0usize;
                let mut prev = c;
                for n in chars.by_ref() {
                    out.push(n);
                    match (prev, n) {
                        ('/', '*') => {
                            depth += 1;
                            prev = ' ';
                            continue;
                        }
                        ('*', '/') => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                            prev = ' ';
                            continue;
                        }
                        _ => {}
                    }
                    prev = n;
                }
            }
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                out.push_str("::");
            }
            ':' if chars.peek().is_some_and(|n| n.is_ascii_alphabetic() || *n == '_') => {
                let mut name = String::new();
                while let Some(&n) = chars.peek() {
                    if !(n.is_ascii_alphanumeric() || n == '_') {
                        break;
                    }
                    name.push(n);
                    chars.next();
                }

                let index = match names.iter().position(|existing| *existing == name) {
                    Some(i) => i,
                    None => {
                        names.push(name);
                        names.len() - 1
                    }
                };
                match casts.get(index).and_then(Option::as_ref) {
                    Some(cast) => {
                        out.push_str(&format!("(${}::{})::{}", index + 1, cast.from, cast.to));
                    }
                    None => {
                        out.push('$');
                        out.push_str(&(index + 1).to_string());
                    }
                }
            }
            _ => out.push(c),
        }
    }

    PositionalSql { sql: out, names }
}
