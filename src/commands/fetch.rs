use crate::core::{
    config::{Dataset, FetchConfig},
    download::Downloader,
};
use crate::error::{FetchError, Result};
use crate::utils::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Pipeline position, advanced only after the preceding step succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    DirectoryReady,
    Downloaded,
    Extracted,
    Done,
}

#[derive(Debug)]
pub struct FetchReport {
    pub stage: Stage,
    pub archive_path: PathBuf,
    pub entries_extracted: usize,
}

/// Download the configured archive into the data directory and unpack it there.
pub fn fetch_dataset(config: &FetchConfig) -> Result<FetchReport> {
    let downloader = Downloader::new();
    let dataset = &config.dataset;
    let archive_path = config.get_archive_path();
    let mut stage = Stage::Start;

    fs::ensure_dir_exists(&config.data_dir)?;
    advance(&mut stage, Stage::DirectoryReady);

    println!("Downloading {}...", dataset.name);
    downloader
        .check_available()
        .map_err(|e| FetchError::transfer(&dataset.url, e.to_string()))?;
    downloader
        .download_file(&dataset.url, &archive_path)
        .map_err(|e| FetchError::transfer(&dataset.url, e.to_string()))?;
    if !fs::is_non_empty_file(&archive_path) {
        return Err(FetchError::transfer(
            &dataset.url,
            format!("no data written to {archive_path:?}"),
        ));
    }
    advance(&mut stage, Stage::Downloaded);

    println!("Extracting files...");
    let entries_extracted = downloader
        .extract_archive(&archive_path, &config.data_dir)
        .map_err(|e| FetchError::extraction(&archive_path, e.to_string()))?;
    advance(&mut stage, Stage::Extracted);

    println!("Organizing files...");
    let mut stdout = std::io::stdout().lock();
    report_summary(&mut stdout, &config.data_dir, dataset);
    advance(&mut stage, Stage::Done);

    Ok(FetchReport {
        stage,
        archive_path,
        entries_extracted,
    })
}

fn advance(stage: &mut Stage, next: Stage) {
    debug_assert!(
        matches!(
            (*stage, next),
            (Stage::Start, Stage::DirectoryReady)
                | (Stage::DirectoryReady, Stage::Downloaded)
                | (Stage::Downloaded, Stage::Extracted)
                | (Stage::Extracted, Stage::Done)
        ),
        "invalid transition {stage:?} -> {next:?}"
    );
    *stage = next;
}

/// Describe where the data landed and how the files are named. Writes are best-effort.
pub fn report_summary<W: Write>(out: &mut W, data_dir: &Path, dataset: &Dataset) {
    let subjects = fs::count_subdirectories(data_dir);
    let suffixes = dataset
        .modalities
        .iter()
        .map(|m| format!("_{}", m.suffix))
        .collect::<Vec<_>>()
        .join(", ");

    let _ = writeln!(out);
    let _ = writeln!(out, "✅ Done! Data is in {}/", data_dir.display());
    let _ = writeln!(out, "   Subject directories found: {subjects}");
    let _ = writeln!(out, "   Files are organized as:");
    let _ = writeln!(
        out,
        "   {}/<patient_id>/<patient_id>_<study_id>_<modality>.mha",
        data_dir.display()
    );
    let _ = writeln!(out, "   Modality suffixes: {suffixes}");
    for modality in &dataset.modalities {
        let _ = writeln!(out, "     • _{}: {}", modality.suffix, modality.description);
    }
    let _ = out.flush();
}
