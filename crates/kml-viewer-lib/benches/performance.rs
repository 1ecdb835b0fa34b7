//! Performance benchmarks for kml-viewer-lib
//!
//! Run with: cargo bench --package kml-viewer-lib

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use geo::{Coord, LineString, Point};
use kml_viewer_lib::{
    Feature, FeatureCollection, Geometry, detail, length_of_line, parse_kml, summarize,
};
use std::fmt::Write;

/// Generate a realistic wiggly track with the specified number of points.
fn generate_track(num_points: usize, base_lat: f64, base_lon: f64) -> Vec<Coord<f64>> {
    (0..num_points)
        .map(|i| {
            let t = i as f64 / num_points as f64;
            Coord {
                x: base_lon + t * 0.1 + (t * 30.0).cos() * 0.001,
                y: base_lat + t * 0.1 + (t * 50.0).sin() * 0.001,
            }
        })
        .collect()
}

/// Generate a collection mixing lines and points
fn generate_collection(num_features: usize, points_per_line: usize) -> FeatureCollection {
    (0..num_features)
        .map(|i| {
            let lat = 51.5 + (i % 10) as f64 * 0.1;
            let lon = -0.1 + (i / 10) as f64 * 0.1;
            if i % 4 == 3 {
                Feature::new(Geometry::Point(Point::new(lon, lat)))
            } else {
                Feature::new(Geometry::LineString(LineString::new(generate_track(
                    points_per_line,
                    lat,
                    lon,
                ))))
            }
        })
        .collect()
}

/// Serialize a set of tracks as a KML document
fn generate_kml(num_placemarks: usize, points_per_line: usize) -> String {
    let mut kml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><kml xmlns="http://www.opengis.net/kml/2.2"><Document>"#,
    );
    for i in 0..num_placemarks {
        kml.push_str("<Placemark><LineString><coordinates>");
        for c in generate_track(points_per_line, 51.5 + i as f64 * 0.01, -0.1) {
            let _ = write!(kml, "{},{},0 ", c.x, c.y);
        }
        kml.push_str("</coordinates></LineString></Placemark>");
    }
    kml.push_str("</Document></kml>");
    kml
}

fn bench_length_of_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("length_of_line");
    for num_points in [100, 10_000, 100_000] {
        let track = generate_track(num_points, 51.5, -0.1);
        group.throughput(Throughput::Elements(num_points as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_points), &track, |b, track| {
            b.iter(|| length_of_line(std::hint::black_box(track)))
        });
    }
    group.finish();
}

fn bench_projections(c: &mut Criterion) {
    let mut group = c.benchmark_group("projections");
    for num_features in [10, 1_000] {
        let collection = generate_collection(num_features, 500);
        group.throughput(Throughput::Elements(num_features as u64));
        group.bench_with_input(
            BenchmarkId::new("summarize", num_features),
            &collection,
            |b, collection| b.iter(|| summarize(std::hint::black_box(collection))),
        );
        group.bench_with_input(
            BenchmarkId::new("detail", num_features),
            &collection,
            |b, collection| b.iter(|| detail(std::hint::black_box(collection))),
        );
    }
    group.finish();
}

fn bench_parse_kml(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_kml");
    group.sample_size(20);
    for num_placemarks in [10, 200] {
        let kml = generate_kml(num_placemarks, 500);
        group.throughput(Throughput::Bytes(kml.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_placemarks), &kml, |b, kml| {
            b.iter(|| parse_kml(std::hint::black_box(kml)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_length_of_line, bench_projections, bench_parse_kml);
criterion_main!(benches);
