use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::config::{ProductConfig, TagsplitConfig};
use crate::error::PipelineError;
use crate::fetch::{SourceFetcher, SyncOutcome};
use crate::loader::SpecLoader;
use crate::parse::spec::SwaggerDocument;
use crate::partition::partition;
use crate::transform::{HostOverride, apply_host_override};
use crate::{ClientEmitter, GeneratedFile};

/// Output file name for a client: `<ClassName>Client.<ext>`.
pub fn client_file_name(class_name: &str, extension: &str) -> String {
    format!("{class_name}Client.{extension}")
}

/// Partition `doc` and emit one client per tag group.
///
/// Everything is rendered in memory, so an error in any group leaves no
/// partial output behind.
pub fn generate_clients<E: ClientEmitter>(
    doc: &SwaggerDocument,
    emitter: &E,
) -> Result<Vec<GeneratedFile>, PipelineError> {
    partition(doc)?
        .into_iter()
        .map(|scoped| -> Result<GeneratedFile, PipelineError> {
            let content = emitter
                .emit(&scoped.class_name, &scoped.document)
                .map_err(|e| PipelineError::Emit {
                    class_name: scoped.class_name.clone(),
                    message: e.to_string(),
                })?;
            Ok(GeneratedFile {
                path: client_file_name(&scoped.class_name, emitter.file_extension()),
                content,
            })
        })
        .collect()
}

/// Write generated files directly under `base`, creating it if needed.
///
/// Every file path must be a plain file name; nothing is written otherwise.
pub fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<Vec<PathBuf>, PipelineError> {
    if let Some(file) = files.iter().find(|f| !is_plain_file_name(&f.path)) {
        return Err(PipelineError::UnsafePath {
            path: file.path.clone(),
        });
    }

    fs::create_dir_all(base).map_err(|source| PipelineError::Write {
        path: base.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = base.join(&file.path);
        fs::write(&path, &file.content).map_err(|source| PipelineError::Write {
            path: path.clone(),
            source,
        })?;
        log::info!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains('\\')
}

/// Everything needed to regenerate the clients of one product.
#[derive(Debug, Clone)]
pub struct ProductJob {
    pub name: String,
    pub repository: String,
    pub branch: String,
    pub checkout: PathBuf,
    /// Spec path relative to `checkout`.
    pub spec: PathBuf,
    pub host_override: HostOverride,
    pub output: PathBuf,
}

impl ProductJob {
    pub fn from_config(config: &TagsplitConfig, name: &str, product: &ProductConfig) -> Self {
        Self {
            name: name.to_string(),
            repository: product.repository.clone(),
            branch: product.branch.clone(),
            checkout: config.checkout_dir(name),
            spec: PathBuf::from(&product.spec),
            host_override: product.host_override.clone(),
            output: PathBuf::from(&config.output),
        }
    }
}

/// Result of a successful product run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub product: String,
    /// `None` when fetching was skipped.
    pub sync: Option<SyncOutcome>,
    pub written: Vec<PathBuf>,
}

/// Fetch → load → retarget → partition → emit → write, for one product at a time.
pub struct Pipeline<F, L, E> {
    fetcher: F,
    loader: L,
    emitter: E,
    skip_fetch: bool,
}

impl<F, L, E> Pipeline<F, L, E>
where
    F: SourceFetcher,
    L: SpecLoader,
    E: ClientEmitter,
{
    pub fn new(fetcher: F, loader: L, emitter: E) -> Self {
        Self {
            fetcher,
            loader,
            emitter,
            skip_fetch: false,
        }
    }

    /// Use the existing checkout as is.
    pub fn skip_fetch(mut self, skip: bool) -> Self {
        self.skip_fetch = skip;
        self
    }

    /// Run one product. Any failing step aborts this product before its
    /// output directory is touched.
    pub fn run(&self, job: &ProductJob) -> Result<RunReport, PipelineError> {
        let sync = if self.skip_fetch {
            log::debug!("{}: skipping fetch", job.name);
            None
        } else {
            Some(
                self.fetcher
                    .sync(&job.repository, &job.checkout, &job.branch)?,
            )
        };

        let spec_path = job.checkout.join(&job.spec);
        let doc = self.loader.load(&spec_path)?;
        let doc = apply_host_override(&doc, &job.host_override);

        let files = generate_clients(&doc, &self.emitter)?;
        let written = write_files(&job.output, &files)?;

        Ok(RunReport {
            product: job.name.clone(),
            sync,
            written,
        })
    }
}
