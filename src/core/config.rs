use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "data";

const PICAI_FOLD0_URL: &str =
    "https://zenodo.org/records/6624726/files/picai_public_images_fold0.zip?download=1";
const PICAI_FOLD0_ARCHIVE: &str = "picai_public_images_fold0.zip";

/// A single downloadable archive and the naming convention of its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub name: String,
    pub url: String,
    pub archive_name: String,
    pub modalities: Vec<Modality>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modality {
    pub suffix: &'static str,
    pub description: &'static str,
}

impl Dataset {
    /// PI-CAI public training images, fold 0.
    pub fn picai_fold0() -> Self {
        Dataset {
            name: "PI-CAI public training images (fold 0)".to_string(),
            url: PICAI_FOLD0_URL.to_string(),
            archive_name: PICAI_FOLD0_ARCHIVE.to_string(),
            modalities: vec![
                Modality {
                    suffix: "t2w",
                    description: "T2-weighted",
                },
                Modality {
                    suffix: "adc",
                    description: "ADC map",
                },
                Modality {
                    suffix: "hbv",
                    description: "high b-value DWI",
                },
                Modality {
                    suffix: "cor",
                    description: "coronal T2-weighted",
                },
                Modality {
                    suffix: "sag",
                    description: "sagittal T2-weighted",
                },
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub data_dir: PathBuf,
    pub dataset: Dataset,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            dataset: Dataset::picai_fold0(),
        }
    }
}

impl FetchConfig {
    pub fn new<P: AsRef<Path>>(data_dir: P, dataset: Dataset) -> Self {
        FetchConfig {
            data_dir: data_dir.as_ref().to_path_buf(),
            dataset,
        }
    }

    pub fn get_archive_path(&self) -> PathBuf {
        self.data_dir.join(&self.dataset.archive_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config_targets_fold0() {
        let config = FetchConfig::default();

        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(
            config.get_archive_path(),
            PathBuf::from("data").join("picai_public_images_fold0.zip")
        );
        assert!(config.dataset.url.starts_with("https://zenodo.org/"));
        assert!(config.dataset.url.contains("picai_public_images_fold0.zip"));
    }

    #[test]
    fn test_fold0_modalities() {
        let suffixes: Vec<&str> = Dataset::picai_fold0()
            .modalities
            .iter()
            .map(|m| m.suffix)
            .collect();

        assert_eq!(suffixes, vec!["t2w", "adc", "hbv", "cor", "sag"]);
    }
}
