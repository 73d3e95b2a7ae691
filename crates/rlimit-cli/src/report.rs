//! Report line rendering.

use rlimit_core::{LimitPair, format_limit};

use crate::resources::ResourceKind;

/// One aligned report line, without the trailing newline.
///
/// ```text
///           CPU Time: soft  unlimited  hard  unlimited
/// ```
pub fn render_line(resource: &ResourceKind, pair: LimitPair, human: bool) -> String {
    format!(
        "{:>18}: soft {:>10}  hard {:>10}",
        resource.name,
        format_limit(pair.soft, human),
        format_limit(pair.hard, human),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources;
    use rlimit_core::RLIM_INFINITY;

    #[test]
    fn test_columns_align() {
        let cpu = resources::by_long("cpu").unwrap();
        assert_eq!(
            render_line(cpu, LimitPair::new(30, RLIM_INFINITY), false),
            "          CPU Time: soft         30  hard  unlimited"
        );
        let stack = resources::by_long("stack").unwrap();
        assert_eq!(
            render_line(stack, LimitPair::new(8 << 20, RLIM_INFINITY), true),
            "        Stack Size: soft      8.00M  hard  unlimited"
        );
    }

    #[test]
    fn test_wide_values_do_not_truncate() {
        let data = resources::by_long("data").unwrap();
        let line = render_line(data, LimitPair::new(123_456_789_012, 123_456_789_012), false);
        assert_eq!(
            line,
            " Data Segment Size: soft 123456789012  hard 123456789012"
        );
    }
}
