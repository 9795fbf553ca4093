use criterion::{black_box, criterion_group, criterion_main, Criterion};
use urikit::{pct_enc, GeneralUri, Uri};

criterion_group!(
    benches,
    bench_parse_simple,
    bench_parse_general,
    bench_parse_data,
    bench_build,
    bench_resolve,
    bench_resolve_general,
    bench_encode,
    bench_decode,
);
criterion_main!(benches);

const SIMPLE_CASE: &str = "https://example.com/search?q=%E6%B5%8B%E8%AF%95#fragment";
const GENERAL_CASE: &str = "HTTPS://User@EXAMPLE.com:443/a/./b/../c/%7efoo?q#f";
const DATA_CASE: &str = "data:text/plain;charset=utf-8;base64,SGVsbG8sIHdvcmxkIQ==";
const RESOLVE_CASE_BASE: &str = "http://example.com/foo/bar";
const RESOLVE_CASE_REF: &str = "../baz";
const ENCODE_CASE: &str = "name=José & co/100% sure";

fn bench_parse_simple(c: &mut Criterion) {
    c.bench_function("parse_simple", |b| {
        b.iter(|| Uri::parse(black_box(SIMPLE_CASE)))
    });
}

fn bench_parse_general(c: &mut Criterion) {
    c.bench_function("parse_general", |b| {
        b.iter(|| Uri::parse(black_box(GENERAL_CASE)))
    });
}

fn bench_parse_data(c: &mut Criterion) {
    c.bench_function("parse_data", |b| b.iter(|| Uri::parse(black_box(DATA_CASE))));
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("build", |b| {
        b.iter(|| {
            Uri::builder()
                .scheme("foo")
                .user_info("user")
                .host("example.com")
                .port(8042)
                .path("/over/there")
                .query("name=ferret")
                .fragment("nose")
                .build()
        })
    });
}

fn bench_resolve(c: &mut Criterion) {
    let base = Uri::parse(RESOLVE_CASE_BASE).unwrap();
    let reference = Uri::parse(RESOLVE_CASE_REF).unwrap();

    c.bench_function("resolve", |b| {
        b.iter(|| black_box(&base).resolve_uri(black_box(&reference)))
    });
}

fn bench_resolve_general(c: &mut Criterion) {
    let base = Uri::General(GeneralUri::parse(RESOLVE_CASE_BASE).unwrap());
    let reference = Uri::General(GeneralUri::parse(RESOLVE_CASE_REF).unwrap());

    c.bench_function("resolve_general", |b| {
        b.iter(|| black_box(&base).resolve_uri(black_box(&reference)))
    });
}

fn bench_encode(c: &mut Criterion) {
    c.bench_function("encode_component", |b| {
        b.iter(|| pct_enc::encode_component(black_box(ENCODE_CASE)))
    });
}

fn bench_decode(c: &mut Criterion) {
    let encoded = pct_enc::encode_component(ENCODE_CASE);

    c.bench_function("decode_component", |b| {
        b.iter(|| pct_enc::decode_component(black_box(&encoded)))
    });
}
