use criterion::{black_box, criterion_group, criterion_main, Criterion};
use timeline_filter::*;

fn make_taxonomy() -> Taxonomy {
    let mut builder = TaxonomyBuilder::new(0, "Event Types");
    for category in 1..=10 {
        builder = builder.sub_type(0, category, format!("Category {category}"));
        for leaf in 0..20 {
            let id = category * 100 + leaf;
            builder = builder.sub_type(category, id, format!("Type {id}"));
        }
    }
    builder.build().expect("taxonomy")
}

fn make_root(taxonomy: &Taxonomy) -> RootFilter {
    let tags = TagsFilter::new();
    let sources = DataSourcesFilter::new();
    for id in 0..50 {
        tags.add_sub_filter(TagNameFilter::new(TagName::new(id, format!("tag {id}"))));
        sources.add_sub_filter(DataSourceFilter::new(format!("source {id}"), id));
    }
    RootFilter::builder()
        .known_filter(HideKnownFilter::new())
        .text_filter(TextFilter::new("password"))
        .tags_filter(tags)
        .data_sources_filter(sources)
        .event_type_filter(EventTypeFilter::from_catalog(taxonomy))
        .build()
}

fn bench_build_copy_render(c: &mut Criterion) {
    let taxonomy = make_taxonomy();
    let root = make_root(&taxonomy);
    let compiler = QueryCompiler::new(SqlDialect::Sqlite);

    c.bench_function("build_event_type_tree", |b| {
        b.iter(|| {
            let _ = EventTypeFilter::from_catalog(black_box(&taxonomy));
        })
    });
    c.bench_function("copy_root", |b| {
        b.iter(|| {
            let _ = black_box(&root).copy_of();
        })
    });
    c.bench_function("render_root", |b| {
        b.iter(|| {
            let _ = compiler.compile_root(black_box(&root));
        })
    });
}

criterion_group!(benches, bench_build_copy_render);
criterion_main!(benches);
