//! Shared building blocks used by every crate in the workspace:
//! logging setup, pagination arithmetic and query-string helpers.

pub mod types;
pub mod utils;
pub mod pagination;
pub mod query;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }
}
