pub use crate::error::{Error, Result};
pub use bbox::{prelude::*, CyCxHW, Transform, HW, TLBR};
pub use getset::{CopyGetters, Getters};
pub use image::{imageops, Rgb, RgbImage};
pub use indexmap::IndexSet;
pub use itertools::Itertools as _;
pub use log::{info, warn};
pub use noisy_float::prelude::*;
pub use rand::prelude::*;
pub use std::{
    fmt,
    fmt::Debug,
    fs, iter,
    ops::Range,
    path::{Path, PathBuf},
    str::FromStr,
};
