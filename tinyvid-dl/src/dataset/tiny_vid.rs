use super::{class_labels, FileRecord, GenericDataset, RandomAccessDataset, Record, Sample, Split};
use crate::{
    common::*,
    dataset::{ChwImage, TRAIN_PER_CLASS, VAL_PER_CLASS},
    processor::{Augmentation, AugmentationInit},
};

/// The tiny-VID single-object detection dataset.
///
/// One subdirectory of images and one whitespace-separated annotation table
/// per class. Records are assembled once, in class-major then sorted file
/// order, so image, class label and box of every index refer to the same
/// physical example by construction.
#[derive(Debug, Getters, CopyGetters)]
pub struct TinyVidDataset {
    /// Class names in sorted directory order.
    #[getset(get = "pub")]
    classes: IndexSet<String>,
    #[getset(get_copy = "pub")]
    split: Split,
    #[getset(get_copy = "pub")]
    augment: bool,
    /// Loaded records, class-major.
    #[getset(get = "pub")]
    records: Vec<Record>,
    /// Per-record box (height, width), the input contract of the external
    /// anchor clustering step.
    #[getset(get = "pub")]
    box_hw: Vec<HW<R64>>,
    /// Pixel size of the first loaded image.
    #[getset(get = "pub")]
    image_size: HW<u32>,
    augmentation: Augmentation,
}

impl TinyVidDataset {
    /// Load every record of `split` from the dataset root directory.
    ///
    /// Construction fails outright on the first unreadable file, short class
    /// directory or inconsistent annotation row; there is no partial dataset.
    pub fn load(root: impl AsRef<Path>, split: Split, augment: bool) -> Result<Self> {
        let root = root.as_ref();
        let (class_dirs, tables) = discover_classes(root)?;

        let classes: IndexSet<String> = class_dirs
            .iter()
            .map(|dir| {
                dir.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default()
            })
            .collect();

        let mut file_records = Vec::with_capacity(classes.len() * split.per_class_len());

        for (class_index, class_dir) in class_dirs.iter().enumerate() {
            let class_name = &classes[class_index];
            let table = find_annotation_table(class_name, &tables).ok_or_else(|| {
                Error::AnnotationTableMissing {
                    class: class_name.clone(),
                    path: root.to_owned(),
                }
            })?;

            let image_files = list_entries(class_dir)?;
            let range = split.per_class_range();
            if image_files.len() < range.end {
                return Err(Error::InsufficientEntries {
                    class: class_name.clone(),
                    path: class_dir.clone(),
                    required: range.end,
                    found: image_files.len(),
                });
            }
            if image_files.len() > TRAIN_PER_CLASS + VAL_PER_CLASS {
                warn!(
                    "class '{}' has {} entries, only the first {} are used by the splits",
                    class_name,
                    image_files.len(),
                    TRAIN_PER_CLASS + VAL_PER_CLASS
                );
            }

            let bboxes = load_annotation_rows(table, class_index, split)?;
            debug_assert_eq!(bboxes.len(), range.len());

            file_records.extend(
                image_files[range.clone()]
                    .iter()
                    .zip(bboxes)
                    .map(|(path, bbox)| FileRecord {
                        path: path.clone(),
                        class: class_index,
                        bbox,
                    }),
            );

            info!(
                "class '{}': {} records for the {} split",
                class_name,
                range.len(),
                split
            );
        }

        let records: Vec<Record> = file_records
            .into_iter()
            .map(|FileRecord { path, class, bbox }| {
                let image = image::open(&path)
                    .map_err(|source| Error::ImageRead {
                        path: path.clone(),
                        source,
                    })?
                    .to_rgb8();
                Ok(Record { image, class, bbox })
            })
            .try_collect()?;

        debug_assert!(records
            .iter()
            .map(|record| record.class)
            .eq(class_labels(split, classes.len())));

        let box_hw: Vec<_> = records
            .iter()
            .map(|record| HW::from_hw(record.bbox.hw()))
            .collect();

        let image_size = {
            let (width, height) = records[0].image.dimensions();
            HW::from_hw([height, width])
        };

        info!(
            "loaded {} records over {} classes for the {} split",
            records.len(),
            classes.len(),
            split
        );

        Ok(Self {
            classes,
            split,
            augment,
            records,
            box_hw,
            image_size,
            augmentation: AugmentationInit::default().build(),
        })
    }

    /// Replace the augmentation pipeline configuration.
    pub fn with_augmentation(mut self, init: AugmentationInit) -> Self {
        self.augmentation = init.build();
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Compose the sample at `index`.
    ///
    /// The stored record is never mutated; the returned image and box are
    /// independent copies. Augmentation runs only for the training split and
    /// only when requested at construction; the validation split stays
    /// deterministic even when augmentation was requested.
    pub fn get<R>(&self, index: usize, rng: &mut R) -> Result<Sample>
    where
        R: Rng + ?Sized,
    {
        let record = self.records.get(index).ok_or(Error::IndexOutOfBounds {
            index,
            len: self.records.len(),
        })?;

        let (image, bbox) = if self.augment && self.split == Split::Train {
            self.augmentation.forward(&record.image, &record.bbox, rng)
        } else {
            (record.image.clone(), record.bbox.clone())
        };

        Ok(Sample {
            image: ChwImage::from_rgb_normalized(&image),
            class: record.class,
            bbox,
        })
    }
}

impl GenericDataset for TinyVidDataset {
    fn input_channels(&self) -> usize {
        3
    }

    fn classes(&self) -> &IndexSet<String> {
        &self.classes
    }
}

impl RandomAccessDataset for TinyVidDataset {
    fn num_records(&self) -> usize {
        self.records.len()
    }

    fn nth(&self, index: usize, rng: &mut dyn RngCore) -> Result<Sample> {
        self.get(index, rng)
    }
}

/// Split the root listing into class image directories and annotation tables.
///
/// The listing is sorted by file name so the class ordering, and every
/// sequence derived from it, is independent of the filesystem's raw
/// directory order. Entries with a documentation marker extension are
/// ignored.
fn discover_classes(root: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut class_dirs = vec![];
    let mut tables = vec![];

    let entries = fs::read_dir(root).map_err(|source| Error::DirectoryList {
        path: root.to_owned(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| Error::DirectoryList {
            path: root.to_owned(),
            source,
        })?;
        let path = entry.path();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("txt") => tables.push(path),
            Some("md") => {}
            _ => {
                if path.is_dir() {
                    class_dirs.push(path);
                }
            }
        }
    }

    if class_dirs.is_empty() {
        return Err(Error::NoClasses {
            path: root.to_owned(),
        });
    }
    class_dirs.sort();
    tables.sort();
    Ok((class_dirs, tables))
}

/// The unique annotation table for a class: its file stem is either the class
/// name itself or the class name followed by an underscored suffix.
fn find_annotation_table<'a>(class: &str, tables: &'a [PathBuf]) -> Option<&'a PathBuf> {
    let mut matches = tables.iter().filter(|path| {
        let stem = path.file_stem().and_then(|stem| stem.to_str()).unwrap_or("");
        stem == class || (stem.starts_with(class) && stem[class.len()..].starts_with('_'))
    });
    let found = matches.next()?;
    matches.next().is_none().then_some(found)
}

/// The files of a class directory, sorted by file name.
fn list_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| Error::DirectoryList {
        path: dir.to_owned(),
        source,
    })?;
    let mut files: Vec<PathBuf> = entries
        .map(|entry| {
            let entry = entry.map_err(|source| Error::DirectoryList {
                path: dir.to_owned(),
                source,
            })?;
            Ok(entry.path())
        })
        .filter_ok(|path| path.is_file())
        .try_collect()?;
    files.sort();
    Ok(files)
}

/// Parse the split's row slice of one annotation table.
///
/// Row layout is `class_id_1_based x_min y_min x_max y_max ...`. The class id
/// is converted to zero-based and checked against the class block; the box is
/// kept as corner coordinates in pixel units. Rows outside the slice are
/// counted but not parsed.
fn load_annotation_rows(path: &Path, class_index: usize, split: Split) -> Result<Vec<TLBR<R64>>> {
    let text = fs::read_to_string(path).map_err(|source| Error::AnnotationRead {
        path: path.to_owned(),
        source,
    })?;

    let range = split.per_class_range();
    let mut bboxes = Vec::with_capacity(range.len());
    let mut num_rows = 0;

    for (line_index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row_index = num_rows;
        num_rows += 1;
        if !range.contains(&row_index) {
            continue;
        }

        let line_no = line_index + 1;
        let fields: Vec<_> = line.split_whitespace().collect();
        if fields.len() < 5 {
            return Err(Error::AnnotationParse {
                path: path.to_owned(),
                line: line_no,
                reason: format!("expected at least 5 columns, got {}", fields.len()),
            });
        }

        let class_id: i64 = parse_field(fields[0], path, line_no)?;
        // the table carries one-based class ids
        if class_id - 1 != class_index as i64 {
            return Err(Error::ClassIdMismatch {
                path: path.to_owned(),
                line: line_no,
                expected: class_index,
                found: class_id - 1,
            });
        }

        let x_min: f64 = parse_field(fields[1], path, line_no)?;
        let y_min: f64 = parse_field(fields[2], path, line_no)?;
        let x_max: f64 = parse_field(fields[3], path, line_no)?;
        let y_max: f64 = parse_field(fields[4], path, line_no)?;

        let bbox = TLBR::try_from_tlbr([r64(y_min), r64(x_min), r64(y_max), r64(x_max)])
            .ok()
            .filter(|bbox: &TLBR<R64>| bbox.h() > r64(0.0) && bbox.w() > r64(0.0))
            .ok_or_else(|| Error::DegenerateBox {
                path: path.to_owned(),
                line: line_no,
            })?;
        bboxes.push(bbox);
    }

    if num_rows < range.end {
        return Err(Error::RowCountMismatch {
            path: path.to_owned(),
            required: range.end,
            found: num_rows,
        });
    }
    Ok(bboxes)
}

fn parse_field<T>(field: &str, path: &Path, line: usize) -> Result<T>
where
    T: FromStr,
{
    field.parse().map_err(|_| Error::AnnotationParse {
        path: path.to_owned(),
        line,
        reason: format!("cannot parse field '{}'", field),
    })
}
