use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::{atlas::Atlas, config::Config, error::Result};

/// Save the named billboards of `atlas` as `<NAME>.png` files in `out_dir`
///
/// An empty `names` list extracts every configured billboard. Unknown names
/// and rectangles that fall outside the atlas are logged and skipped.
pub fn extract_billboards<P: AsRef<Path>>(
    config: &Config,
    atlas: &Atlas,
    names: &[String],
    out_dir: P,
) -> Result<Vec<PathBuf>> {
    let out_dir = out_dir.as_ref();
    std::fs::create_dir_all(out_dir)?;

    let names: Vec<String> = if names.is_empty() {
        config.billboards.keys().cloned().collect()
    } else {
        names.to_vec()
    };

    let mut written = Vec::with_capacity(names.len());
    for name in &names {
        let region = config
            .billboard(name)
            .and_then(|rect| atlas.region(&rect));

        let region = match region {
            Ok(region) => region,
            Err(e) => {
                warn!("Skipping {}: {}", name, e);
                continue;
            }
        };

        let path = out_dir.join(format!("{}.png", name));
        region.save_png(&path)?;
        info!("Extracted {} ({}x{}) to {:?}", name, region.width(), region.height(), path);
        written.push(path);
    }

    Ok(written)
}
