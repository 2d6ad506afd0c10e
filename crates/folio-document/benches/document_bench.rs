// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the folio-document crate: option merging and
// record encoding against the in-memory engine.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use folio_bridge::MemoryEngine;
use folio_core::{
    DataProviderRef, DocumentPermission, EncryptionAlgorithm, RenderOptionKey, RenderOptions,
    RenderScope, SaveConfig, SaveOption, SecurityOptions,
};
use folio_document::Document;

fn security_option() -> SaveOption {
    SaveOption::Security(
        SecurityOptions::new(128, EncryptionAlgorithm::Aes)
            .with_owner_password("owner")
            .with_permissions([DocumentPermission::Printing, DocumentPermission::Extract]),
    )
}

/// Merge a long option list where most keys collide.
fn bench_option_merge(c: &mut Criterion) {
    let options: Vec<SaveOption> = (0..64)
        .map(|i| if i % 2 == 0 { security_option() } else { SaveOption::ForceRewrite })
        .collect();

    c.bench_function("merge 64 save options", |b| {
        b.iter(|| SaveConfig::from_options(black_box(&options)))
    });
}

/// Encode a document with every render scope populated.
fn bench_encode(c: &mut Criterion) {
    let engine = MemoryEngine::new();
    let document = Document::create(&engine, vec![DataProviderRef::file("/bench/a.pdf")], true);
    document.set_title("Benchmark");
    for scope in RenderScope::ALL {
        let mut options = RenderOptions::new();
        options.insert(RenderOptionKey::PageColor, serde_json::json!("#ffffff"));
        options.insert(RenderOptionKey::InvertRendering, serde_json::json!(false));
        document.set_render_options(scope, Some(options));
    }

    c.bench_function("encode document record", |b| {
        b.iter(|| black_box(&document).to_json())
    });
}

criterion_group!(benches, bench_option_merge, bench_encode);
criterion_main!(benches);
