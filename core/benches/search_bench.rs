use criterion::{criterion_group, criterion_main, Criterion};
use time::OffsetDateTime;
use tripdata_core::index::{rank, SearchFilters, SearchIndexRecord};
use tripdata_core::tokenizer::search_terms;
use tripdata_core::DestinationType;

fn corpus() -> Vec<SearchIndexRecord> {
    (0..2_000)
        .map(|i| SearchIndexRecord {
            id: format!("dest_{i:05}"),
            name: format!("Place {i}"),
            search_text: format!("place {i} heritage fort temple lake market beach trek {}", i % 37),
            tags: vec!["heritage".into(), "nature".into(), format!("tag{}", i % 11)],
            kind: DestinationType::ALL[i % DestinationType::ALL.len()],
            rating: (i % 50) as f64 / 10.0,
            estimated_budget: 10_000 + (i as u32 % 9) * 5_000,
            last_updated: OffsetDateTime::UNIX_EPOCH,
        })
        .collect()
}

fn bench_rank(c: &mut Criterion) {
    let entries = corpus();
    let terms = search_terms("heritage fort tag3");
    let filters = SearchFilters { min_rating: Some(2.0), ..Default::default() };
    c.bench_function("rank_2000_entries", |b| b.iter(|| rank(entries.clone(), &terms, &filters)));
}

criterion_group!(benches, bench_rank);
criterion_main!(benches);
