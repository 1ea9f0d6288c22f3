//! Benchmarks for mesh operations.

use brep::prelude::*;
use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::{Point3, Vector3};

fn grid_data(n: usize) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n * 2);

    // Create grid vertices
    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }

    // Create triangles
    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    (vertices, faces)
}

fn create_grid_mesh(n: usize) -> BrepMesh {
    let (vertices, faces) = grid_data(n);
    build_from_triangles(&vertices, &faces).unwrap()
}

fn bench_mesh_construction(c: &mut Criterion) {
    let (vertices, faces) = grid_data(10);
    c.bench_function("build_grid_10x10", |b| {
        b.iter(|| {
            let mesh: BrepMesh = build_from_triangles(&vertices, &faces).unwrap();
            mesh
        });
    });

    let mesh = create_grid_mesh(50);
    c.bench_function("find_edge_all", |b| {
        b.iter(|| {
            let mut found = 0;
            for (_, edge) in mesh.edges().iter() {
                let [u, w] = edge.vertices();
                found += mesh.find_edge(w, u).is_some() as usize;
            }
            found
        });
    });
}

fn bench_normals(c: &mut Criterion) {
    let mut mesh = create_grid_mesh(100);

    c.bench_function("face_normals_100x100", |b| {
        b.iter(|| generate_face_normals(&mut mesh).unwrap());
    });

    c.bench_function("vertex_normals_100x100", |b| {
        b.iter(|| generate_vertex_normals(&mut mesh).unwrap());
    });
}

fn bench_bvh(c: &mut Criterion) {
    let mesh = create_grid_mesh(100);

    c.bench_function("bvh_build_100x100", |b| {
        let mut bvh = Bvh::new();
        b.iter(|| {
            bvh.build_mesh(&mesh).unwrap();
            bvh.node_count()
        });
    });

    let collider = MeshCollider::new(mesh).unwrap();
    let rays: Vec<Ray> = (0..1000)
        .map(|i| {
            let x = 0.5 + (i % 40) as f64 * 2.4;
            let y = 0.5 + (i / 40) as f64 * 3.9;
            Ray::new(Point3::new(x, y, 1.0), Vector3::new(0.0, 0.0, -1.0))
        })
        .collect();

    c.bench_function("raycast_1000", |b| {
        b.iter(|| {
            rays.iter()
                .filter(|ray| collider.intersection(ray).is_some())
                .count()
        });
    });
}

criterion_group!(benches, bench_mesh_construction, bench_normals, bench_bvh);
criterion_main!(benches);
