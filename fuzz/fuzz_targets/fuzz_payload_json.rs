// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
#![no_main]

use concept_atlas::ingest::{load_str, IngestOptions};
use concept_atlas::scaling::CharWidthEstimate;
use concept_atlas::views::{derive_views, LayoutParams};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(dataset) = load_str(text, &IngestOptions::default()) {
        let _ = derive_views(&dataset, &LayoutParams::default(), &CharWidthEstimate::default());
    }
});
