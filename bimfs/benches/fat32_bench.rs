// SPDX-License-Identifier: MIT

use criterion::{Criterion, criterion_group, criterion_main};

use bimfs::fat32::*;

criterion_group!(benches, fat32_format_bench);
criterion_main!(benches);

const ESP_BYTES: u64 = 33 * 1024 * 1024;

pub fn fat32_format_bench(c: &mut Criterion) {
    let meta = Fat32Meta::new(ESP_BYTES, 2048, 0xB1A5_ED00).expect("meta failed");

    let mut buf = vec![0u8; ESP_BYTES as usize];
    let mut mem_io = MemBimIO::new(&mut buf);

    c.bench_function("fat32_meta", |b| {
        b.iter(|| Fat32Meta::new(ESP_BYTES, 2048, 0).expect("meta failed"));
    });

    c.bench_function("fat32_quick_format_mem", |b| {
        b.iter(|| {
            let mut formatter = Fat32Formatter::new(&mut mem_io, &meta);
            formatter.format(false).expect("format failed");
        });
    });

    c.bench_function("fat32_full_format_mem", |b| {
        b.iter(|| {
            let mut formatter = Fat32Formatter::new(&mut mem_io, &meta);
            formatter.format(true).expect("format failed");
        });
    });

    let mut file = tempfile::tempfile().expect("tempfile failed");
    file.set_len(ESP_BYTES).expect("set_len failed");
    let mut temp_io = StdBimIO::new(&mut file);

    c.bench_function("fat32_quick_format_file", |b| {
        b.iter(|| {
            let mut formatter = Fat32Formatter::new(&mut temp_io, &meta);
            formatter.format(false).expect("format failed");
        });
    });
}
