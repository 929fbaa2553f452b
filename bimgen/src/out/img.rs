// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use bimio::prelude::*;
use bimpart::guid::GuidGenerator;
use bimpart::layout::ImageLayout;

use crate::image::{ImageReport, write_image};
use crate::utils;

/// How the image reaches the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Every structure is written straight to the file at its offset.
    Direct,
    /// The image is built in memory and written out once.
    Staged,
}

/// Entry point: create the `.img` file at `output`.
pub fn create(output: &Path, layout: &ImageLayout, mode: WriteMode) -> anyhow::Result<ImageReport> {
    let t0 = Instant::now();
    let total_bytes = layout.total_bytes();

    let mut file = File::options()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(output)
        .with_context(|| format!("open: cannot create {}", output.display()))?;

    crate::log_verbose!(
        "{} sectors ({}) • mode {:?}",
        utils::sep_u64(layout.total_sectors),
        utils::pretty_bytes(total_bytes),
        mode
    );

    let mut guids = GuidGenerator::from_os();
    let report = match mode {
        WriteMode::Direct => {
            let mut io = StdBimIO::new(&mut file);
            io.set_len(total_bytes)
                .map_err(|e| anyhow::anyhow!("open: cannot size {}: {}", output.display(), e))?;
            write_image(&mut io, layout, &mut guids)?
        }
        WriteMode::Staged => {
            let mut buf = vec![0u8; total_bytes as usize];
            let report = write_image(&mut MemBimIO::new(&mut buf), layout, &mut guids)?;
            file.write_all(&buf)
                .and_then(|()| file.flush())
                .with_context(|| format!("image write: cannot write {}", output.display()))?;
            report
        }
    };

    crate::log_info!(
        "{} written in {:.2}s",
        utils::pretty_bytes(total_bytes),
        t0.elapsed().as_secs_f32()
    );
    Ok(report)
}
