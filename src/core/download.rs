use anyhow::Result;
use std::fs::File;
use std::path::Path;
use std::process::Command;
use zip::ZipArchive;

const TRANSFER_TOOL: &str = "curl";
const USER_AGENT: &str = concat!("User-Agent: picai-fetch/", env!("CARGO_PKG_VERSION"));

pub struct Downloader;

impl Default for Downloader {
    fn default() -> Self {
        Self
    }
}

impl Downloader {
    pub fn new() -> Self {
        Self
    }

    /// Fails when the transfer tool is not on `PATH`.
    pub fn check_available(&self) -> Result<()> {
        which::which(TRANSFER_TOOL)
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("{TRANSFER_TOOL} not found on PATH: {e}"))
    }

    pub fn download_file(&self, url: &str, destination: &Path) -> Result<()> {
        println!("Downloading from {url}...");

        let output = Command::new(TRANSFER_TOOL)
            .arg("-f") // Non-success HTTP status is a failure
            .arg("-L") // Follow redirects
            .arg("-sS") // Silent, but keep error messages
            .arg("-H")
            .arg(USER_AGENT)
            .arg("-o")
            .arg(destination)
            .arg(url)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow::anyhow!(
                "{TRANSFER_TOOL} exited with status {:?}: {}",
                output.status.code(),
                stderr.trim()
            ));
        }

        println!("Downloaded to {destination:?}");
        Ok(())
    }

    /// Unpacks a zip archive into `destination` and returns the number of entries written.
    pub fn extract_archive(&self, archive_path: &Path, destination: &Path) -> Result<usize> {
        println!("Extracting {archive_path:?} to {destination:?}");

        std::fs::create_dir_all(destination)?;
        let written = self.extract_zip(archive_path, destination)?;

        println!("Extraction completed ({written} entries)");
        Ok(written)
    }

    fn extract_zip(&self, archive_path: &Path, destination: &Path) -> Result<usize> {
        let file = File::open(archive_path)?;
        let mut archive = ZipArchive::new(file)?;
        let mut written = 0;

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            // Entries that would land outside the destination are skipped
            let outpath = match file.enclosed_name() {
                Some(path) => destination.join(path),
                None => continue,
            };

            if file.is_dir() {
                std::fs::create_dir_all(&outpath)?;
            } else {
                if let Some(p) = outpath.parent() {
                    if !p.exists() {
                        std::fs::create_dir_all(p)?;
                    }
                }
                let mut outfile = File::create(&outpath)?;
                std::io::copy(&mut file, &mut outfile)?;
            }

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = file.unix_mode() {
                    std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))?;
                }
            }

            written += 1;
        }
        Ok(written)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_extract_zip_recreates_layout() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("fold.zip");
        let dest = temp.path().join("data");
        build_zip(
            &archive,
            &[
                ("10000/", b""),
                ("10000/10000_1000000_t2w.mha", b"t2w"),
                ("10000/10000_1000000_adc.mha", b"adc"),
            ],
        );

        let written = Downloader::new().extract_archive(&archive, &dest).unwrap();

        assert_eq!(written, 3);
        assert_eq!(
            std::fs::read(dest.join("10000/10000_1000000_t2w.mha")).unwrap(),
            b"t2w"
        );
        assert!(dest.join("10000/10000_1000000_adc.mha").is_file());
    }

    #[test]
    fn test_extract_overwrites_existing_files() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("fold.zip");
        let dest = temp.path().join("data");
        std::fs::create_dir_all(dest.join("subject1")).unwrap();
        std::fs::write(dest.join("subject1/subject1_t2w.mha"), b"stale contents").unwrap();
        build_zip(&archive, &[("subject1/subject1_t2w.mha", b"fresh")]);

        Downloader::new().extract_archive(&archive, &dest).unwrap();

        assert_eq!(
            std::fs::read(dest.join("subject1/subject1_t2w.mha")).unwrap(),
            b"fresh"
        );
    }

    #[test]
    fn test_extract_skips_entries_escaping_destination() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("fold.zip");
        let dest = temp.path().join("data");
        build_zip(
            &archive,
            &[("../escaped.mha", b"nope"), ("subject1/subject1_hbv.mha", b"hbv")],
        );

        let written = Downloader::new().extract_archive(&archive, &dest).unwrap();

        assert_eq!(written, 1);
        assert!(!temp.path().join("escaped.mha").exists());
        assert!(dest.join("subject1/subject1_hbv.mha").is_file());
    }

    #[test]
    fn test_extract_rejects_non_archive() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("fold.zip");
        std::fs::write(&archive, b"<html>Not Found</html>").unwrap();

        let result = Downloader::new().extract_archive(&archive, &temp.path().join("data"));
        assert!(result.is_err());
    }

    #[test]
    fn test_download_file_url() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source.zip");
        let dest = temp.path().join("copy.zip");
        std::fs::write(&source, b"archive bytes").unwrap();

        Downloader::new()
            .download_file(&file_url(&source), &dest)
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"archive bytes");
    }

    #[test]
    fn test_download_follows_redirect() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("fold.zip");
        let base = serve(vec![
            Route {
                path: "/records/1/files/fold.zip",
                status: "302 Found",
                headers: vec!["Location: /payload/fold.zip".to_string()],
                body: Vec::new(),
            },
            Route {
                path: "/payload/fold.zip",
                status: "200 OK",
                headers: Vec::new(),
                body: b"payload".to_vec(),
            },
        ]);

        Downloader::new()
            .download_file(&format!("{base}/records/1/files/fold.zip"), &dest)
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"payload");
    }

    #[test]
    fn test_download_fails_on_http_errors() {
        let temp = TempDir::new().unwrap();
        let base = serve(vec![Route {
            path: "/broken.zip",
            status: "500 Internal Server Error",
            headers: Vec::new(),
            body: b"boom".to_vec(),
        }]);
        let downloader = Downloader::new();

        assert!(downloader
            .download_file(&format!("{base}/missing.zip"), &temp.path().join("a.zip"))
            .is_err());
        assert!(downloader
            .download_file(&format!("{base}/broken.zip"), &temp.path().join("b.zip"))
            .is_err());
        assert!(downloader
            .download_file(&refused_url(), &temp.path().join("c.zip"))
            .is_err());
    }

    #[test]
    fn test_transfer_tool_available() {
        assert!(Downloader::new().check_available().is_ok());
    }
}
