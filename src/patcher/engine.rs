use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::{
    atlas::Atlas,
    config::Config,
    error::{PatcherError, Result},
    frame::{FrameCompositor, FrameStyle, FrameStyleRegistry},
    patcher::job::{JobFailure, PatchJob, PatchReport},
    raster::{PixelBuffer, Rect},
};

/// Runs a batch of patch jobs against one or more atlas files
///
/// For every atlas the engine:
/// 1. Skips it with a warning if the file is missing
/// 2. Optionally writes a timestamped backup
/// 3. Builds each billboard: reference frame, thickness, composite
/// 4. Writes the billboards into the atlas and saves it
///
/// Content images are decoded once up front; a job whose content or billboard
/// cannot be resolved is reported and skipped without stopping the run.
pub struct PatchEngine {
    config: Config,
    style: Box<dyn FrameStyle>,
    compositor: FrameCompositor,
}

/// A job whose billboard and content are resolved
struct PreparedJob<'a> {
    job: &'a PatchJob,
    rect: Rect,
    content: PixelBuffer,
}

impl PatchEngine {
    /// Create a new engine with the given configuration and frame style
    pub fn new(config: Config, style: Box<dyn FrameStyle>) -> Self {
        let compositor = FrameCompositor::new(
            config.fit.mode,
            config.fit.backdrop,
            config.detection.clone(),
        );
        Self { config, style, compositor }
    }

    /// Create an engine using the style named in the configuration
    pub fn from_config(config: Config) -> Result<Self> {
        let style = FrameStyleRegistry::new()
            .get_style(&config.frame.style)
            .ok_or_else(|| PatcherError::UnknownStyle { name: config.frame.style.clone() })?;
        Ok(Self::new(config, style))
    }

    /// Apply `jobs` to every atlas in `atlases`, in order
    pub fn run(&self, jobs: &[PatchJob], atlases: &[PathBuf]) -> Result<PatchReport> {
        info!("Patching {} billboard(s) into {} atlas file(s)", jobs.len(), atlases.len());
        info!("   Frame: {} ({})", self.style.name(), self.config.frame.thickness);
        info!("   Fit: {:?}", self.compositor.fit_mode());

        let mut report = PatchReport::default();
        let prepared = self.prepare_jobs(jobs, &mut report);

        if prepared.is_empty() {
            warn!("No patch jobs could be prepared; atlases left untouched");
            return Ok(report);
        }

        for atlas_path in atlases {
            if !atlas_path.exists() {
                warn!("Atlas {:?} not found, skipping", atlas_path);
                report.atlases_skipped.push(atlas_path.clone());
                continue;
            }

            let mut atlas = match Atlas::open(atlas_path) {
                Ok(atlas) => atlas,
                Err(e) => {
                    warn!("Could not load atlas {:?}: {}", atlas_path, e);
                    report.atlases_skipped.push(atlas_path.clone());
                    continue;
                }
            };

            info!("Processing {:?}", atlas_path);
            let applied = self.patch_atlas(&mut atlas, &prepared, &mut report)?;

            if applied == 0 {
                warn!("Nothing applied to {:?}, not saving", atlas_path);
                continue;
            }

            if self.config.targets.backup {
                atlas.backup()?;
            }
            atlas.save()?;
            report.applied += applied;
            report.atlases_written.push(atlas_path.clone());
        }

        info!(
            "Done: {} billboard(s) applied, {} atlas file(s) written, {} failure(s)",
            report.applied,
            report.atlases_written.len(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Resolve billboard rectangles and decode content images
    fn prepare_jobs<'a>(&self, jobs: &'a [PatchJob], report: &mut PatchReport) -> Vec<PreparedJob<'a>> {
        let mut prepared = Vec::with_capacity(jobs.len());

        for job in jobs {
            let resolved = self
                .config
                .billboard(&job.billboard)
                .and_then(|rect| PixelBuffer::open(&job.content).map(|content| (rect, content)));

            match resolved {
                Ok((rect, content)) => {
                    debug!(
                        "{}: {:?} ({}x{}) -> {}",
                        job.billboard,
                        job.content,
                        content.width(),
                        content.height(),
                        rect
                    );
                    prepared.push(PreparedJob { job, rect, content });
                }
                Err(e) => {
                    warn!("Skipping {}: {}", job.billboard, e.user_message());
                    report.failures.push(JobFailure {
                        job: job.clone(),
                        atlas: None,
                        reason: e.to_string(),
                    });
                }
            }
        }

        prepared
    }

    /// Apply every prepared job to one atlas, returning how many succeeded
    fn patch_atlas(
        &self,
        atlas: &mut Atlas,
        prepared: &[PreparedJob<'_>],
        report: &mut PatchReport,
    ) -> Result<usize> {
        let mut applied = 0;

        for item in prepared {
            let outcome = self
                .build_billboard(atlas, item.job, &item.rect, &item.content)
                .and_then(|billboard| atlas.apply_patch(&item.rect, &billboard));

            match outcome {
                Ok(()) => {
                    info!("   Updated {}", item.job.billboard);
                    applied += 1;
                }
                Err(e) if e.is_item_skippable() => {
                    warn!("   Failed to update {}: {}", item.job.billboard, e);
                    report.failures.push(JobFailure {
                        job: item.job.clone(),
                        atlas: Some(atlas.path().to_path_buf()),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(applied)
    }

    /// Composite `content` into the frame of `job`'s billboard as it appears
    /// in `atlas` (or in the reference directory)
    pub fn build_billboard(
        &self,
        atlas: &Atlas,
        job: &PatchJob,
        rect: &Rect,
        content: &PixelBuffer,
    ) -> Result<PixelBuffer> {
        let existing = self.load_existing(atlas, job.frame_source())?;
        if existing.dimensions() != (rect.width, rect.height) {
            return Err(PatcherError::invalid_dimensions(format!(
                "frame source {} is {}x{} but {} is {}",
                job.frame_source(),
                existing.width(),
                existing.height(),
                job.billboard,
                rect
            )));
        }

        let thickness = self
            .compositor
            .resolve_thickness(&existing, self.config.frame.thickness);
        debug!("   {}: border {}px", job.billboard, thickness);

        let reference = self.style.reference(&existing, thickness, &self.config.frame)?;
        self.compositor.composite(&reference, content, thickness)
    }

    /// The current look of billboard `name`: the reference directory copy if
    /// there is one, else the pixels in the atlas
    fn load_existing(&self, atlas: &Atlas, name: &str) -> Result<PixelBuffer> {
        if let Some(path) = self.reference_path(name) {
            if path.exists() {
                debug!("   Using reference frame {:?}", path);
                return PixelBuffer::open(&path);
            }
            debug!("   No reference frame at {:?}, using atlas pixels", path);
        }

        let rect = self.config.billboard(name)?;
        atlas.region(&rect)
    }

    fn reference_path(&self, name: &str) -> Option<PathBuf> {
        self.config
            .targets
            .reference_dir
            .as_deref()
            .map(|dir| dir.join(format!("{}.png", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{PixelArtFrame, ReferenceFrame, Thickness};
    use std::collections::BTreeMap;
    use tempfile::{tempdir, TempDir};

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];
    const RED: [u8; 4] = [255, 0, 0, 255];
    const GRASS: [u8; 4] = [40, 160, 60, 255];

    /// 120x60 atlas with two 40x30 billboards, each black with a 5px white frame
    fn atlas_buffer() -> PixelBuffer {
        let mut sheet = PixelBuffer::new_filled(120, 60, GRASS);
        for rect in [Rect::new(10, 10, 40, 30), Rect::new(60, 10, 40, 30)] {
            for y in 0..rect.height {
                for x in 0..rect.width {
                    let ring = x < 5 || y < 5 || x >= rect.width - 5 || y >= rect.height - 5;
                    sheet.set_pixel(rect.x + x, rect.y + y, if ring { WHITE } else { BLACK });
                }
            }
        }
        sheet
    }

    fn test_config() -> Config {
        let mut billboards = BTreeMap::new();
        billboards.insert("A".to_string(), Rect::new(10, 10, 40, 30));
        billboards.insert("B".to_string(), Rect::new(60, 10, 40, 30));
        let mut config = Config {
            billboards,
            ..Config::default()
        };
        config.frame.thickness = Thickness::Fixed(5);
        config
    }

    struct Fixture {
        dir: TempDir,
        atlas: PathBuf,
        content: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = tempdir().unwrap();
        let atlas = dir.path().join("sprites.png");
        atlas_buffer().save_png(&atlas).unwrap();

        let content = dir.path().join("ad.png");
        PixelBuffer::new_filled(50, 50, RED).save_png(&content).unwrap();

        Fixture { dir, atlas, content }
    }

    fn assert_framed_red(sheet: &PixelBuffer, rect: Rect, t: u32) {
        for y in 0..rect.height {
            for x in 0..rect.width {
                let ring = x < t || y < t || x >= rect.width - t || y >= rect.height - t;
                let expected = if ring { WHITE } else { RED };
                assert_eq!(sheet.get_pixel(rect.x + x, rect.y + y), expected, "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_patch_keeps_frame_and_fills_interior() {
        let fx = fixture();
        let engine = PatchEngine::new(test_config(), Box::new(ReferenceFrame::new()));

        let report = engine
            .run(&[PatchJob::new(&fx.content, "A")], &[fx.atlas.clone()])
            .unwrap();

        assert!(report.is_clean());
        assert_eq!(report.applied, 1);
        assert_eq!(report.atlases_written, vec![fx.atlas.clone()]);

        let sheet = PixelBuffer::open(&fx.atlas).unwrap();
        assert_framed_red(&sheet, Rect::new(10, 10, 40, 30), 5);
        // Billboard B and the surroundings are untouched
        assert_eq!(sheet.get_pixel(80, 25), BLACK);
        assert_eq!(sheet.get_pixel(0, 0), GRASS);
    }

    #[test]
    fn test_detected_thickness() {
        let fx = fixture();
        let mut config = test_config();
        config.frame.thickness = Thickness::Detect;
        let engine = PatchEngine::from_config(config).unwrap();

        engine
            .run(&[PatchJob::new(&fx.content, "B")], &[fx.atlas.clone()])
            .unwrap();

        let sheet = PixelBuffer::open(&fx.atlas).unwrap();
        assert_framed_red(&sheet, Rect::new(60, 10, 40, 30), 5);
    }

    #[test]
    fn test_missing_atlas_and_content_do_not_abort() {
        let fx = fixture();
        let engine = PatchEngine::new(test_config(), Box::new(ReferenceFrame::new()));
        let missing_atlas = fx.dir.path().join("public").join("sprites.png");

        let jobs = vec![
            PatchJob::new(fx.dir.path().join("gone.png"), "A"),
            PatchJob::new(&fx.content, "NOT_A_BILLBOARD"),
            PatchJob::new(&fx.content, "B"),
        ];
        let report = engine
            .run(&jobs, &[missing_atlas.clone(), fx.atlas.clone()])
            .unwrap();

        assert_eq!(report.atlases_skipped, vec![missing_atlas]);
        assert_eq!(report.atlases_written, vec![fx.atlas.clone()]);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.applied, 1);

        let sheet = PixelBuffer::open(&fx.atlas).unwrap();
        assert_eq!(sheet.get_pixel(30, 25), BLACK);
        assert_framed_red(&sheet, Rect::new(60, 10, 40, 30), 5);
    }

    #[test]
    fn test_two_atlases_end_up_identical() {
        let fx = fixture();
        let second = fx.dir.path().join("copy.png");
        std::fs::copy(&fx.atlas, &second).unwrap();

        let engine = PatchEngine::new(test_config(), Box::new(ReferenceFrame::new()));
        let jobs = vec![PatchJob::new(&fx.content, "A"), PatchJob::new(&fx.content, "B")];
        let report = engine.run(&jobs, &[fx.atlas.clone(), second.clone()]).unwrap();

        assert_eq!(report.applied, 4);
        let first = PixelBuffer::open(&fx.atlas).unwrap();
        let copy = PixelBuffer::open(&second).unwrap();
        assert_eq!(first.as_bytes(), copy.as_bytes());
    }

    #[test]
    fn test_rerun_is_stable() {
        let fx = fixture();
        let engine = PatchEngine::new(test_config(), Box::new(ReferenceFrame::new()));
        let jobs = vec![PatchJob::new(&fx.content, "A")];

        engine.run(&jobs, &[fx.atlas.clone()]).unwrap();
        let once = PixelBuffer::open(&fx.atlas).unwrap();
        engine.run(&jobs, &[fx.atlas.clone()]).unwrap();
        let twice = PixelBuffer::open(&fx.atlas).unwrap();

        assert_eq!(once.as_bytes(), twice.as_bytes());
    }

    #[test]
    fn test_semi_transparent_frame_survives_reruns() {
        let fx = fixture();
        let ghost = [200, 200, 200, 128];
        let mut sheet = PixelBuffer::new_transparent(20, 20);
        for y in 0..20 {
            for x in 0..20 {
                let ring = x < 3 || y < 3 || x >= 17 || y >= 17;
                sheet.set_pixel(x, y, if ring { ghost } else { BLACK });
            }
        }
        sheet.save_png(&fx.atlas).unwrap();

        let mut config = test_config();
        config.billboards.clear();
        config.billboards.insert("GHOST".to_string(), Rect::new(0, 0, 20, 20));
        config.frame.thickness = Thickness::Fixed(3);
        let engine = PatchEngine::new(config, Box::new(ReferenceFrame::new()));
        let jobs = vec![PatchJob::new(&fx.content, "GHOST")];

        engine.run(&jobs, &[fx.atlas.clone()]).unwrap();
        let once = PixelBuffer::open(&fx.atlas).unwrap();
        assert_eq!(once.get_pixel(0, 0), ghost);
        assert_eq!(once.get_pixel(19, 10), ghost);
        assert_eq!(once.get_pixel(10, 10), RED);

        engine.run(&jobs, &[fx.atlas.clone()]).unwrap();
        let twice = PixelBuffer::open(&fx.atlas).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_reference_dir_frame_is_used() {
        let fx = fixture();
        let refs = fx.dir.path().join("refs");
        std::fs::create_dir(&refs).unwrap();
        let mut framed = PixelBuffer::new_filled(40, 30, BLACK);
        for y in 0..30 {
            for x in 0..40 {
                if x < 5 || y < 5 || x >= 35 || y >= 25 {
                    framed.set_pixel(x, y, [0, 0, 255, 255]);
                }
            }
        }
        framed.save_png(refs.join("A.png")).unwrap();

        let mut config = test_config();
        config.targets.reference_dir = Some(refs);
        let engine = PatchEngine::new(config, Box::new(ReferenceFrame::new()));
        engine
            .run(&[PatchJob::new(&fx.content, "A")], &[fx.atlas.clone()])
            .unwrap();

        let sheet = PixelBuffer::open(&fx.atlas).unwrap();
        assert_eq!(sheet.get_pixel(10, 10), [0, 0, 255, 255]);
        assert_eq!(sheet.get_pixel(30, 25), RED);
    }

    #[test]
    fn test_frame_borrowed_from_same_sized_billboard() {
        let fx = fixture();
        let mut sheet = atlas_buffer();
        // Wreck A's frame; B still has a clean one
        for x in 10..50 {
            sheet.set_pixel(x, 10, [9, 9, 9, 255]);
        }
        sheet.save_png(&fx.atlas).unwrap();

        let engine = PatchEngine::new(test_config(), Box::new(ReferenceFrame::new()));
        let job = PatchJob::new(&fx.content, "A").with_frame_from("B");
        engine.run(&[job], &[fx.atlas.clone()]).unwrap();

        let patched = PixelBuffer::open(&fx.atlas).unwrap();
        assert_framed_red(&patched, Rect::new(10, 10, 40, 30), 5);
    }

    #[test]
    fn test_pixel_art_style() {
        let fx = fixture();
        let mut config = test_config();
        config.frame.thickness = Thickness::Fixed(4);
        let engine = PatchEngine::new(config, Box::new(PixelArtFrame::new()));

        engine
            .run(&[PatchJob::new(&fx.content, "A")], &[fx.atlas.clone()])
            .unwrap();

        let sheet = PixelBuffer::open(&fx.atlas).unwrap();
        assert_eq!(sheet.get_pixel(30, 10), [140, 120, 80, 255]);
        assert_eq!(sheet.get_pixel(30, 13), [180, 160, 120, 255]);
        assert_eq!(sheet.get_pixel(30, 25), RED);
    }

    #[test]
    fn test_oversized_thickness_is_item_failure() {
        let fx = fixture();
        let mut config = test_config();
        config.frame.thickness = Thickness::Fixed(15);
        let engine = PatchEngine::new(config, Box::new(ReferenceFrame::new()));

        let report = engine
            .run(&[PatchJob::new(&fx.content, "A")], &[fx.atlas.clone()])
            .unwrap();

        assert_eq!(report.applied, 0);
        assert_eq!(report.failures.len(), 1);
        assert!(report.atlases_written.is_empty());
        assert_eq!(PixelBuffer::open(&fx.atlas).unwrap(), atlas_buffer());
    }

    #[test]
    fn test_unknown_style() {
        let mut config = test_config();
        config.frame.style = "neon".to_string();
        assert!(matches!(
            PatchEngine::from_config(config),
            Err(PatcherError::UnknownStyle { .. })
        ));
    }
}
