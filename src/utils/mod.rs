//! Shared helpers: external commands, path handling, pluralization.

pub mod exec;
pub mod path;

/// Return "s" suffix for plural counts
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format count with noun, handling pluralization (`3 modules`, `1 error`)
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, plural_s(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "module"), "0 modules");
        assert_eq!(plural_count(1, "error"), "1 error");
        assert_eq!(plural_count(2, "error"), "2 errors");
    }
}
