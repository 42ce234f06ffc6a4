//! Route registration in a project's routes file.
//!
//! Two formats are supported. [`RoutesFormat::Json`] treats the file as a
//! JSON array and appends objects structurally. [`RoutesFormat::Sentinel`]
//! splices object literals into a source file right before the
//! [`ROUTES_SENTINEL`] marker, as older generated projects expect.
//!
//! A route whose name is already registered is left alone, so running a
//! feature generator twice does not duplicate entries.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::DomainError;

/// Marker closing the routes array in sentinel-format files.
pub const ROUTES_SENTINEL: &str = "]; // Application routes";

const DEFAULT_VERSION: &str = "v1";

/// A route to register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl RouteDescriptor {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            version: None,
        }
    }
}

/// Layout of the routes file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutesFormat {
    #[default]
    Json,
    Sentinel,
}

impl RoutesFormat {
    /// Return the new file contents with `routes` registered.
    pub fn inject(
        self,
        contents: &str,
        routes: &[RouteDescriptor],
    ) -> Result<String, DomainError> {
        match self {
            Self::Json => inject_json(contents, routes),
            Self::Sentinel => inject_sentinel(contents, routes),
        }
    }

    /// The subset of `routes` not yet registered in `contents`.
    pub fn pending(
        self,
        contents: &str,
        routes: &[RouteDescriptor],
    ) -> Result<Vec<RouteDescriptor>, DomainError> {
        let registered = match self {
            Self::Json => json_entries(contents)?
                .iter()
                .filter_map(|entry| entry.get("route")?.as_str().map(str::to_owned))
                .collect::<Vec<_>>(),
            Self::Sentinel => routes
                .iter()
                .filter(|r| contents.contains(&format!("route: '{}'", r.name)))
                .map(|r| r.name.clone())
                .collect(),
        };
        Ok(routes
            .iter()
            .filter(|r| !registered.contains(&r.name))
            .cloned()
            .collect())
    }
}

/// Entries of a JSON routes document; blank means none.
fn json_entries(contents: &str) -> Result<Vec<Value>, DomainError> {
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    match serde_json::from_str(contents) {
        Ok(Value::Array(entries)) => Ok(entries),
        Ok(_) => Err(DomainError::MalformedRoutes(
            "top level value is not an array".into(),
        )),
        Err(e) => Err(DomainError::MalformedRoutes(e.to_string())),
    }
}

/// Append `routes` to a JSON array document.
///
/// An empty (or whitespace-only) file is treated as an empty array.
pub fn inject_json(contents: &str, routes: &[RouteDescriptor]) -> Result<String, DomainError> {
    let fresh = RoutesFormat::Json.pending(contents, routes)?;
    let mut entries = json_entries(contents)?;

    entries.extend(fresh.iter().map(|route| {
        json!({
            "route": route.name,
            "path": route.path,
            "version": route.version.as_deref().unwrap_or(DEFAULT_VERSION),
        })
    }));

    let mut out = serde_json::to_string_pretty(&Value::Array(entries))
        .map_err(|e| DomainError::MalformedRoutes(e.to_string()))?;
    out.push('\n');
    Ok(out)
}

/// Splice `routes` as object literals before [`ROUTES_SENTINEL`].
///
/// The character immediately preceding the sentinel is dropped and replaced
/// by the generated block, which always ends with a newline. Everything
/// from the sentinel onward is preserved unchanged.
pub fn inject_sentinel(contents: &str, routes: &[RouteDescriptor]) -> Result<String, DomainError> {
    let idx = contents
        .find(ROUTES_SENTINEL)
        .ok_or(DomainError::SentinelNotFound {
            sentinel: ROUTES_SENTINEL,
        })?;

    let routes = RoutesFormat::Sentinel.pending(contents, routes)?;
    if routes.is_empty() {
        return Ok(contents.to_owned());
    }

    let cut = contents[..idx]
        .char_indices()
        .next_back()
        .map_or(0, |(i, _)| i);
    let (pre, post) = (&contents[..cut], &contents[idx..]);

    let is_first = pre.ends_with("  ");
    let has_trailing_comma = pre.ends_with(',');

    let mut block = String::new();
    for (index, route) in routes.iter().enumerate() {
        let opener = match (index, is_first, has_trailing_comma) {
            (0, true, _) => "{\n",
            (0, false, false) => ", {\n",
            _ => " {\n",
        };
        block.push_str(opener);
        block.push_str(&format!("    route: '{}',\n", route.name));
        block.push_str(&format!("    path: '{}',\n", route.path));
        block.push_str("    version: routeVersions.v1,\n");
        block.push_str("  },");
    }
    block.push('\n');

    Ok(format!("{pre}{block}{post}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_ROUTES: &str = "import routeVersions from './versions';\n\nconst routes = [\n  \n]; // Application routes\n\nexport default routes;\n";

    fn auth_routes() -> Vec<RouteDescriptor> {
        vec![RouteDescriptor::new("foo", "bar")]
    }

    #[test]
    fn sentinel_injection_inserts_literal_before_marker() {
        let out = inject_sentinel(EMPTY_ROUTES, &auth_routes()).unwrap();

        let marker = out.find(ROUTES_SENTINEL).unwrap();
        let before = &out[..marker];
        assert!(before.contains("route: 'foo'"));
        assert!(before.contains("path: 'bar'"));
        assert!(before.contains("version: routeVersions.v1"));

        let original_post = &EMPTY_ROUTES[EMPTY_ROUTES.find(ROUTES_SENTINEL).unwrap()..];
        assert_eq!(&out[marker..], original_post);
    }

    #[test]
    fn sentinel_first_route_has_no_leading_comma() {
        let out = inject_sentinel(EMPTY_ROUTES, &auth_routes()).unwrap();
        assert!(out.contains("const routes = [\n  {\n    route: 'foo',\n"));
        assert!(out.contains("  },\n]; // Application routes"));
    }

    #[test]
    fn sentinel_second_injection_follows_trailing_comma() {
        let once = inject_sentinel(EMPTY_ROUTES, &auth_routes()).unwrap();
        let twice = inject_sentinel(&once, &[RouteDescriptor::new("baz", "qux")]).unwrap();

        assert!(twice.contains("  }, {\n    route: 'baz',\n"));
        assert_eq!(twice.matches("version: routeVersions.v1").count(), 2);
        assert!(twice.ends_with("]; // Application routes\n\nexport default routes;\n"));
    }

    #[test]
    fn sentinel_without_trailing_comma_gets_separator() {
        let src = "const routes = [\n  { route: 'a' }\n]; // Application routes\n";
        let out = inject_sentinel(src, &auth_routes()).unwrap();
        assert!(out.contains("{ route: 'a' }, {\n    route: 'foo',"));
    }

    #[test]
    fn missing_sentinel_is_an_error() {
        let err = inject_sentinel("const routes = [];\n", &auth_routes()).unwrap_err();
        assert!(matches!(err, DomainError::SentinelNotFound { .. }));
    }

    #[test]
    fn json_injection_appends_objects() {
        let out = inject_json("[]\n", &auth_routes()).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            value,
            json!([{ "route": "foo", "path": "bar", "version": "v1" }])
        );
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn json_injection_keeps_existing_entries() {
        let existing = r#"[{"route":"health","path":"health","version":"v1"}]"#;
        let mut route = RouteDescriptor::new("auth", "authentication");
        route.version = Some("v2".into());

        let out = RoutesFormat::Json.inject(existing, &[route]).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[0]["route"], "health");
        assert_eq!(value[1]["version"], "v2");
    }

    #[test]
    fn json_injection_rejects_non_arrays() {
        assert!(matches!(
            inject_json("{}", &auth_routes()),
            Err(DomainError::MalformedRoutes(_))
        ));
        assert!(inject_json("not json", &auth_routes()).is_err());
    }

    #[test]
    fn registered_routes_are_not_added_again() {
        let once = inject_json("[]", &auth_routes()).unwrap();
        let twice = inject_json(&once, &auth_routes()).unwrap();
        assert_eq!(once, twice);

        let spliced = inject_sentinel(EMPTY_ROUTES, &auth_routes()).unwrap();
        assert_eq!(inject_sentinel(&spliced, &auth_routes()).unwrap(), spliced);
    }

    #[test]
    fn pending_lists_only_unknown_names() {
        let existing = r#"[{"route":"foo","path":"bar","version":"v1"}]"#;
        let routes = [RouteDescriptor::new("foo", "bar"), RouteDescriptor::new("baz", "qux")];

        let pending = RoutesFormat::Json.pending(existing, &routes).unwrap();
        assert_eq!(pending, [RouteDescriptor::new("baz", "qux")]);
        assert_eq!(RoutesFormat::Json.pending("", &routes).unwrap().len(), 2);
    }

    #[test]
    fn empty_json_file_counts_as_empty_array() {
        let out = inject_json("", &auth_routes()).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
    }
}
