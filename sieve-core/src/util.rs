/// Writes every value through `f`, placing `separator` between the values that actually
/// produced some output.
pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut first = true;
    for v in values {
        let position = out.len();
        if !first {
            out.push_str(separator);
        }
        let len = out.len();
        f(out, v);
        if out.len() == len {
            out.truncate(position);
        } else {
            first = false;
        }
    }
}

/// Fallible version of [`separated_by`].
pub fn try_separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) -> crate::Result<()>
where
    F: FnMut(&mut String, T) -> crate::Result<()>,
{
    let mut result = Ok(());
    separated_by(
        out,
        values,
        |out, v| {
            if result.is_ok() {
                result = f(out, v);
            }
        },
        separator,
    );
    result
}

/// Writes `value` replacing every occurrence of `search` with `replace`.
pub fn write_escaped(out: &mut String, value: &str, search: char, replace: &str) {
    let mut position = 0;
    for (i, c) in value.char_indices() {
        if c == search {
            out.push_str(&value[position..i]);
            out.push_str(replace);
            position = i + c.len_utf8();
        }
    }
    out.push_str(&value[position..]);
}

/// Splits the leading characters matching `predicate` off `input`.
pub fn consume_while<'s>(input: &mut &'s str, predicate: impl FnMut(&char) -> bool) -> &'s str {
    let len = input
        .chars()
        .take_while(predicate)
        .map(char::len_utf8)
        .sum::<usize>();
    if len == 0 {
        return "";
    }
    let result = &input[..len];
    *input = &input[len..];
    result
}

/// Finds `keyword` in `haystack` as a standalone word, outside of single quoted text.
pub fn find_keyword(haystack: &str, keyword: &str) -> Option<usize> {
    let bytes = haystack.as_bytes();
    let mut quoted = false;
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if c == b'\'' {
            quoted = !quoted;
        } else if !quoted && bytes[i..].starts_with(keyword.as_bytes()) {
            let before = i == 0 || !is_word_byte(bytes[i - 1]);
            let end = i + keyword.len();
            let after = end >= bytes.len() || !is_word_byte(bytes[end]);
            if before && after {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

fn is_word_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

/// Longest prefix of `value` not exceeding `len` bytes that ends on a char boundary.
pub fn char_prefix(value: &str, len: usize) -> &str {
    let mut end = len.min(value.len());
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

#[macro_export]
macro_rules! possibly_parenthesized {
    ($buff:ident, $cond:expr, $v:expr) => {
        if $cond {
            $buff.push('(');
            $v;
            $buff.push(')');
        } else {
            $v;
        }
    };
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            $crate::char_prefix(&$query, 497).trim_end(),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separated() {
        let mut out = String::new();
        separated_by(&mut out, ["a", "", "b"], |out, v| out.push_str(v), ", ");
        assert_eq!(out, "a, b");

        let mut out = String::from("(");
        separated_by(&mut out, ["a", ""], |out, v| out.push_str(v), ", ");
        assert_eq!(out, "(a");
    }

    #[test]
    fn escaped() {
        let mut out = String::new();
        write_escaped(&mut out, "it's ok", '\'', "''");
        assert_eq!(out, "it''s ok");
        out.clear();
        write_escaped(&mut out, "a]b]", ']', "]]");
        assert_eq!(out, "a]]b]]");
    }

    #[test]
    fn keyword() {
        assert_eq!(find_keyword("INTEGER PRIMARY KEY", "PRIMARY KEY"), Some(8));
        assert_eq!(find_keyword("VARCHAR(255) COMMENT 'PRIMARY KEY'", "PRIMARY KEY"), None);
        assert_eq!(find_keyword("NOREFERENCES", "REFERENCES"), None);
    }

    #[test]
    fn consume() {
        let mut input = "abc123";
        assert_eq!(consume_while(&mut input, |c| c.is_alphabetic()), "abc");
        assert_eq!(input, "123");
        assert_eq!(consume_while(&mut input, |c| c.is_alphabetic()), "");
    }
}
