//! Low-cardinality route labels.

use uuid::Uuid;

/// Path with UUID segments replaced by `{uuid}`, e.g. `/orders/{uuid}`.
pub(super) fn route_label(path: &str) -> String {
    let segments: Vec<&str> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if Uuid::try_parse(segment).is_ok() {
                "{uuid}"
            } else {
                segment
            }
        })
        .collect();

    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_stays_root() {
        assert_eq!(route_label("/"), "/");
    }

    #[test]
    fn plain_paths_are_unchanged() {
        assert_eq!(route_label("/orders"), "/orders");
    }

    #[test]
    fn uuid_segments_are_collapsed() {
        assert_eq!(
            route_label("/orders/0191f0c9-a3b0-7c52-a1e4-d2f1b0c9e8d7/notes"),
            "/orders/{uuid}/notes"
        );
    }
}
