use std::io::{Cursor, Read};
use std::path::Path;

use hanzi_config::Config;
use zip::ZipArchive;

/// Extension of the CC-CEDICT member inside the published archive
const CEDICT_MEMBER_SUFFIX: &str = ".u8";

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("download from {url} failed: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid dictionary archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("dictionary archive has no .u8 file")]
    MissingMember,

    #[error("failed to write resource: {0}")]
    Io(#[from] std::io::Error),
}

/// Downloads the dictionary and HSK files when they are missing locally
pub struct ResourceFetcher {
    client: reqwest::Client,
}

impl Default for ResourceFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceFetcher {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetch whatever `config` names but the disk lacks. Does nothing unless
    /// `resources.auto_download` is set.
    pub async fn ensure(&self, config: &Config) -> Result<(), ResourceError> {
        if !config.resources.auto_download {
            tracing::debug!("Resource download disabled");
            return Ok(());
        }

        self.ensure_dictionary(
            Path::new(&config.dictionary.path),
            &config.resources.cedict_url,
        )
        .await?;
        self.ensure_hsk(Path::new(&config.hsk.path), &config.resources.hsk_url)
            .await?;
        Ok(())
    }

    /// Download and unpack the CC-CEDICT archive into `dest`. Returns false
    /// when `dest` already exists.
    pub async fn ensure_dictionary(&self, dest: &Path, url: &str) -> Result<bool, ResourceError> {
        if dest.exists() {
            return Ok(false);
        }

        tracing::info!("Downloading CC-CEDICT from {}", url);
        let archive = self.fetch(url).await?;
        extract_dictionary(&archive, dest)?;
        tracing::info!("Dictionary written to {}", dest.display());
        Ok(true)
    }

    /// Download the HSK vocabulary into `dest`. Returns false when `dest`
    /// already exists.
    pub async fn ensure_hsk(&self, dest: &Path, url: &str) -> Result<bool, ResourceError> {
        if dest.exists() {
            return Ok(false);
        }

        tracing::info!("Downloading HSK vocabulary from {}", url);
        let body = self.fetch(url).await?;
        write_resource(dest, &body)?;
        tracing::info!("HSK vocabulary written to {}", dest.display());
        Ok(true)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ResourceError> {
        let download = |source| ResourceError::Download {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(download)?;
        let body = response.bytes().await.map_err(download)?;
        Ok(body.to_vec())
    }
}

/// Write the `.u8` member of a CC-CEDICT zip archive to `dest`
pub fn extract_dictionary(archive: &[u8], dest: &Path) -> Result<(), ResourceError> {
    let mut archive = ZipArchive::new(Cursor::new(archive))?;
    let name = archive
        .file_names()
        .find(|name| name.ends_with(CEDICT_MEMBER_SUFFIX))
        .map(str::to_string)
        .ok_or(ResourceError::MissingMember)?;

    let mut contents = Vec::new();
    archive.by_name(&name)?.read_to_end(&mut contents)?;
    write_resource(dest, &contents)
}

/// Written to a sibling `.part` file, then renamed into place
fn write_resource(dest: &Path, contents: &[u8]) -> Result<(), ResourceError> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let partial = dest.with_extension("part");
    std::fs::write(&partial, contents)?;
    std::fs::rename(&partial, dest)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use hanzi_core::dictionary::Dictionary;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    use super::*;
    use crate::{CedictDictionary, HskLevels};

    const CEDICT: &str = "# CC-CEDICT\n中國 中国 [Zhong1 guo2] /China/\n";
    const HSK_JSON: &str = r#"[{"simplified": "中国", "level": ["new-1", "old-2"]}]"#;

    fn archive(members: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, contents) in members {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    /// Serve fixed bodies by path over plain HTTP; returns base URL and hit count
    async fn serve(routes: HashMap<&'static str, Vec<u8>>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).to_string();
                let path = request.split_whitespace().nth(1).unwrap_or("/");
                counter.fetch_add(1, Ordering::SeqCst);

                let (status, body) = match routes.get(path) {
                    Some(body) => ("200 OK", body.clone()),
                    None => ("404 Not Found", Vec::new()),
                };
                let head = format!(
                    "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&body).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{addr}"), hits)
    }

    fn fetcher() -> ResourceFetcher {
        ResourceFetcher::with_client(reqwest::Client::builder().no_proxy().build().unwrap())
    }

    #[test]
    fn extracts_dictionary_member() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested").join("cedict_ts.u8");
        let zip = archive(&[("readme.txt", "ignore me"), ("cedict_ts.u8", CEDICT)]);

        extract_dictionary(&zip, &dest).unwrap();

        let dict = CedictDictionary::load_from_file(&dest).unwrap();
        assert_eq!(dict.lookup("中国")[0].definition, "China");
        assert!(!dest.with_extension("part").exists());
    }

    #[test]
    fn archive_without_dictionary_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("cedict_ts.u8");
        let zip = archive(&[("readme.txt", "nothing here")]);

        assert!(matches!(
            extract_dictionary(&zip, &dest),
            Err(ResourceError::MissingMember)
        ));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn downloads_missing_resources_once() {
        let routes = HashMap::from([
            ("/cedict.zip", archive(&[("cedict_ts.u8", CEDICT)])),
            ("/complete.json", HSK_JSON.as_bytes().to_vec()),
        ]);
        let (base, hits) = serve(routes).await;
        let dir = tempfile::tempdir().unwrap();

        let mut config = Config::default();
        config.dictionary.path = dir.path().join("cedict_ts.u8").display().to_string();
        config.hsk.path = dir.path().join("hsk.json").display().to_string();
        config.resources.auto_download = true;
        config.resources.cedict_url = format!("{base}/cedict.zip");
        config.resources.hsk_url = format!("{base}/complete.json");

        let fetcher = fetcher();
        fetcher.ensure(&config).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        let dict = CedictDictionary::load_from_file(Path::new(&config.dictionary.path)).unwrap();
        assert_eq!(dict.entry_count(), 1);
        let hsk = HskLevels::load_from_file(Path::new(&config.hsk.path)).unwrap();
        assert_eq!(hsk.label_of("中国"), "2");

        // Present files are left alone
        fetcher.ensure(&config).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn disabled_download_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.dictionary.path = dir.path().join("cedict_ts.u8").display().to_string();
        config.resources.cedict_url = "http://127.0.0.1:9/unreachable.zip".to_string();

        fetcher().ensure(&config).await.unwrap();
        assert!(!Path::new(&config.dictionary.path).exists());
    }

    #[tokio::test]
    async fn http_error_is_reported() {
        let (base, _) = serve(HashMap::new()).await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("hsk.json");

        let result = fetcher()
            .ensure_hsk(&dest, &format!("{base}/missing.json"))
            .await;
        assert!(matches!(result, Err(ResourceError::Download { .. })));
        assert!(!dest.exists());
    }
}
