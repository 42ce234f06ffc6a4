use std::path::Path;

use tracing::debug;

use crate::application::ports::Filesystem;
use crate::domain::{MARKER_FILE, ProjectContext};
use crate::error::WizardResult;

impl ProjectContext {
    /// Read `<root>/.wizard`, if present, and build the context once.
    pub fn load(filesystem: &dyn Filesystem, root: &Path) -> WizardResult<Self> {
        let marker_path = root.join(MARKER_FILE);
        let contents = if filesystem.exists(&marker_path) {
            Some(filesystem.read_to_string(&marker_path)?)
        } else {
            None
        };

        let context = Self::from_marker_contents(root, contents.as_deref())?;
        debug!(
            root = %root.display(),
            project = ?context.marker().map(|m| m.project_type.as_str()),
            "Project context loaded"
        );
        Ok(context)
    }
}
