use crate::config::{StorageBackend, StorageConfig};
use derive_more::Display;
use object_store::buffered::BufWriter;
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectStore};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::error::Error;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tracing::{error, info};

const CHUNK_SIZE: usize = 64 * 1024;

/// Objects larger than this go through a multipart upload in parts of this size.
const PART_SIZE: usize = 10 * 1024 * 1024;

/// Characters left alone when an object name is escaped as one URL path segment.
/// Everything else, `/` included, is percent-encoded.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b',')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'@');

#[derive(Debug, Display)]
pub enum UploadError {
    #[display("cannot read upload stream: {_0}")]
    Read(io::Error),
    #[display("cannot write object: {_0}")]
    Write(io::Error),
    #[display("cannot read object metadata: {_0}")]
    Metadata(object_store::Error),
}

impl Error for UploadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            UploadError::Read(err) | UploadError::Write(err) => Some(err),
            UploadError::Metadata(err) => Some(err),
        }
    }
}

/// Writes uploaded files to the object store and hands out their public urls.
#[derive(Clone)]
pub struct UploadService {
    store: Arc<dyn ObjectStore>,
    config: StorageConfig,
    part_size: usize,
}

impl UploadService {
    pub fn new(store: Arc<dyn ObjectStore>, config: StorageConfig) -> Self {
        Self {
            store,
            config,
            part_size: PART_SIZE,
        }
    }

    pub fn with_part_size(self, part_size: usize) -> Self {
        Self { part_size, ..self }
    }

    /// Streams `reader` to `<prefix>/<filename>` and returns the public url of the object.
    ///
    /// An existing object with the same name is overwritten, callers pick unique names.
    /// When reading or writing fails midway the partial upload is aborted.
    pub async fn upload<R>(
        &self,
        mut reader: R,
        filename: &str,
        content_type: Option<&str>,
    ) -> Result<String, UploadError>
    where
        R: AsyncRead + Unpin,
    {
        let path = self.object_path(filename);

        let mut writer = BufWriter::with_capacity(self.store.clone(), path.clone(), self.part_size);
        if let Some(content_type) = content_type.filter(|_| self.supports_attributes()) {
            let mut attributes = Attributes::new();
            attributes.insert(Attribute::ContentType, content_type.to_string().into());
            writer = writer.with_attributes(attributes);
        }

        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            let n = match reader.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => n,
                Err(err) => {
                    abort(&mut writer, &path).await;
                    return Err(UploadError::Read(err));
                }
            };

            if let Err(err) = writer.write_all(&buf[..n]).await {
                abort(&mut writer, &path).await;
                return Err(UploadError::Write(err));
            }
        }

        // a failed multipart completion already aborts the upload
        writer.shutdown().await.map_err(UploadError::Write)?;

        let meta = self
            .store
            .head(&path)
            .await
            .map_err(UploadError::Metadata)?;

        info!("Uploaded {} ({} bytes)", meta.location, meta.size);

        Ok(self.public_url(meta.location.as_ref()))
    }

    /// Location of `filename` inside the bucket.
    pub fn object_path(&self, filename: &str) -> Path {
        let prefix = self.config.upload_prefix.trim_matches('/');
        Path::from(format!("{}/{}", prefix, filename))
    }

    /// `<base>/v0/b/<bucket>/o/<escaped name>?alt=media`, the download url Firebase Storage
    /// serves public objects from.
    pub fn public_url(&self, object_name: &str) -> String {
        format!(
            "{}/v0/b/{}/o/{}?alt=media",
            self.config.public_base_url.trim_end_matches('/'),
            self.config.bucket,
            utf8_percent_encode(object_name, PATH_SEGMENT),
        )
    }

    /// Inverse of [`UploadService::public_url`]: the object path a url points to.
    pub fn object_path_from_url(&self, url: &str) -> Option<Path> {
        let (_, rest) = url.split_once("/o/")?;
        let encoded = rest.split(['?', '#']).next()?;
        if encoded.is_empty() {
            return None;
        }
        let name = percent_decode_str(encoded).decode_utf8().ok()?;
        Path::parse(name.as_ref()).ok()
    }

    // the local file system backend refuses object attributes
    fn supports_attributes(&self) -> bool {
        self.config.backend != StorageBackend::Local
    }
}

// `BufWriter::abort` panics once the writer is shut down
async fn abort(writer: &mut BufWriter, path: &Path) {
    if let Err(e) = writer.abort().await {
        error!("Cannot abort upload of {}: {}", path, e);
    }
}
