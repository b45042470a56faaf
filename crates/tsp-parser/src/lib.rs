use memmap2::{Advice, Mmap};
use std::{fs::File, path::Path};
use thiserror::Error;
use tsp_core::instance::TSPSymInstance;

use crate::{
    data_section::parse_data_sections,
    metadata::{MetaDataParseError, parse_metadata},
};

pub mod data_section;
pub mod distance_container;
pub mod metadata;

/// The raw, mmap-backed bytes of a TSPLIB instance file.
///
/// Parsing functions take `&FileContent` rather than `&Mmap` directly so that
/// tests can feed them an in-memory `Vec<u8>` without mapping a real file.
pub type FileContent = [u8];

#[derive(Error, Debug)]
pub enum ParserError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    MetaDataParsing(#[from] MetaDataParseError),
}

pub fn parse_tsp_instance<P: AsRef<Path>>(instance_path: P) -> Result<TSPSymInstance, ParserError> {
    // Safety: This is the only point at which we access the file, so the file should not be modified otherwise.
    let mmap = unsafe { Mmap::map(&File::open(instance_path)?)? };
    mmap.advise(Advice::Sequential)?;
    let mut index_in_map = 0;

    let (metadata, data_keyword) = parse_metadata(&mmap, &mut index_in_map)?;

    let distances = parse_data_sections(&mmap, &mut index_in_map, data_keyword, &metadata);

    Ok(TSPSymInstance::new_from_distances_sym(distances, metadata))
}