use crate::schema::{DependencyResolver, TableSchema};
use anyhow::{anyhow, bail, Result};
use tracing::info;

/// Resolves which tables to export based on include/exclude filters
pub fn resolve_tables(
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
) -> Result<Vec<&'static TableSchema>> {
    let resolver = DependencyResolver::new();

    match (include, exclude) {
        (Some(_), Some(_)) => {
            bail!("Cannot use both --include and --exclude at the same time");
        }
        (Some(include_list), None) => {
            let refs: Vec<&str> = include_list.iter().map(|s| s.as_str()).collect();
            let tables = resolver.resolve_includes(&refs).map_err(|e| anyhow!(e))?;

            let names: Vec<_> = tables.iter().map(|t| t.name).collect();
            info!(requested = ?refs, included = ?names, "Resolved table dependencies");

            Ok(tables)
        }
        (None, Some(exclude_list)) => {
            let refs: Vec<&str> = exclude_list.iter().map(|s| s.as_str()).collect();
            let tables = resolver.resolve_excludes(&refs).map_err(|e| anyhow!(e))?;

            info!(excluded = ?refs, remaining = tables.len(), "Applied table exclusions");

            Ok(tables)
        }
        (None, None) => Ok(resolver.all_tables_ordered()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_and_exclude_conflict() {
        let result = resolve_tables(Some(vec!["recipes".into()]), Some(vec!["locations".into()]));
        assert!(result.is_err());
    }

    #[test]
    fn test_no_filter_returns_all_tables() {
        assert_eq!(resolve_tables(None, None).unwrap().len(), 6);
    }

    #[test]
    fn test_include_pulls_in_parents() {
        let tables = resolve_tables(Some(vec!["recipes".into()]), None).unwrap();
        let names: Vec<_> = tables.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["activities", "locations", "recipes"]);
    }
}
