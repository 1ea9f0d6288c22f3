//! Brep CLI - inspect and ray-cast generated meshes.
//!
//! Usage: brep <COMMAND> [OPTIONS]
//!
//! Run `brep --help` for available commands.

use std::time::Instant;

use clap::{Parser, Subcommand};
use nalgebra::{Point3, Vector3};

use brep::algo::{generate_face_normals, generate_loop_barycentric, generate_vertex_normals};
use brep::bvh::BvhOptions;
use brep::collider::MeshCollider;
use brep::geom::{Aabb, Ray};
use brep::mesh::{build_from_polygons, BrepMesh, MeshIndex, POSITION};

#[derive(Parser)]
#[command(name = "brep")]
#[command(author, version, about = "B-rep mesh kernel CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display information about a generated grid mesh
    Info {
        /// Number of cells along each side of the grid
        #[arg(short, long, default_value = "16")]
        grid: usize,

        /// Build quads instead of triangles
        #[arg(long)]
        quads: bool,
    },

    /// Cast a bundle of vertical rays at a generated grid mesh
    Raycast {
        /// Number of cells along each side of the grid
        #[arg(short, long, default_value = "64")]
        grid: usize,

        /// Number of rays along each side of the sample bundle
        #[arg(short, long, default_value = "100")]
        rays: usize,

        /// Maximum primitives per BVH leaf
        #[arg(long, default_value = "2")]
        leaf_size: usize,

        /// Number of SAH bins per split
        #[arg(long, default_value = "16")]
        bins: usize,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { grid, quads } => {
            cmd_info(grid, quads)?;
        }

        Commands::Raycast {
            grid,
            rays,
            leaf_size,
            bins,
        } => {
            cmd_raycast(grid, rays, leaf_size, bins)?;
        }
    }

    Ok(())
}

/// A rippled height field over the unit square with `n * n` cells.
fn grid_mesh(n: usize, quads: bool) -> Result<BrepMesh, Box<dyn std::error::Error>> {
    if n == 0 {
        return Err("grid must have at least one cell".into());
    }

    let side = n.checked_add(1).ok_or("grid is too large")?;
    let vertex_count = side.checked_mul(side).ok_or("grid is too large")?;
    if vertex_count > <u32 as MeshIndex>::MAX.to_usize() {
        return Err("grid is too large".into());
    }

    let step = 1.0 / n as f64;
    let mut positions = Vec::with_capacity(vertex_count);
    for j in 0..=n {
        for i in 0..=n {
            let (x, y) = (i as f64 * step, j as f64 * step);
            let z = 0.05 * (6.0 * x).sin() * (6.0 * y).cos();
            positions.push(Point3::new(x, y, z));
        }
    }

    let index = |i: usize, j: usize| j * (n + 1) + i;
    let mut faces: Vec<Vec<usize>> = Vec::new();
    for j in 0..n {
        for i in 0..n {
            let (a, b, c, d) = (
                index(i, j),
                index(i + 1, j),
                index(i + 1, j + 1),
                index(i, j + 1),
            );
            if quads {
                faces.push(vec![a, b, c, d]);
            } else {
                faces.push(vec![a, b, c]);
                faces.push(vec![a, c, d]);
            }
        }
    }

    let start = Instant::now();
    let mesh = build_from_polygons(&positions, &faces)?;
    log::info!("Built {}x{} grid in {:.2?}", n, n, start.elapsed());
    Ok(mesh)
}

fn cmd_info(grid: usize, quads: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = grid_mesh(grid, quads)?;

    let start = Instant::now();
    generate_face_normals(&mut mesh)?;
    generate_vertex_normals(&mut mesh)?;
    generate_loop_barycentric(&mut mesh)?;
    log::info!("Derived attributes in {:.2?}", start.elapsed());

    let kind = if quads { "quad" } else { "triangle" };
    println!("Mesh: {}x{} {} grid", grid, grid, kind);
    println!("  Vertices: {}", mesh.num_vertices());
    println!("  Edges:    {}", mesh.num_edges());
    println!("  Loops:    {}", mesh.num_loops());
    println!("  Faces:    {}", mesh.num_faces());

    let loop_counts: Vec<usize> = mesh.edges().iter().map(|(_, e)| e.loops().len()).collect();
    let wire = loop_counts.iter().filter(|&&n| n < 2).count();
    let shared = loop_counts.iter().filter(|&&n| n == 2).count();
    println!("  Boundary edges: {}", wire);
    println!("  Shared edges:   {}", shared);

    let positions = mesh.vertices().attributes().get::<Point3<f64>>(POSITION)?;
    let bounds = Aabb::from_points(positions.as_slice());
    println!(
        "  Bounds: [{:.3}, {:.3}, {:.3}] - [{:.3}, {:.3}, {:.3}]",
        bounds.min.x, bounds.min.y, bounds.min.z, bounds.max.x, bounds.max.y, bounds.max.z
    );

    println!("\nAttributes:");
    let print_names = |kind: &str, names: Vec<&str>| {
        let mut names = names;
        names.sort_unstable();
        println!("  {:<8} {}", kind, names.join(", "));
    };
    print_names("vertex", mesh.vertices().attributes().names().collect());
    print_names("edge", mesh.edges().attributes().names().collect());
    print_names("loop", mesh.loops().attributes().names().collect());
    print_names("face", mesh.faces().attributes().names().collect());

    println!("\nValid: {}", mesh.is_valid());
    Ok(())
}

fn cmd_raycast(
    grid: usize,
    rays: usize,
    leaf_size: usize,
    bins: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let cast = rays.checked_mul(rays).ok_or("too many rays")?;
    let mesh = grid_mesh(grid, false)?;
    let options = BvhOptions::default()
        .with_max_leaf_size(leaf_size)
        .with_bins(bins);

    let start = Instant::now();
    let collider = MeshCollider::with_options(mesh, options)?;
    println!(
        "BVH: {} nodes over {} faces, built in {:.2?}",
        collider.bvh().node_count(),
        collider.mesh().num_faces(),
        start.elapsed()
    );

    // Sample slightly inside the grid so no ray grazes the outer boundary
    let down = Vector3::new(0.0, 0.0, -1.0);
    let step = 0.98 / rays.max(1) as f64;
    let start = Instant::now();
    let mut hits = 0usize;
    let mut total_distance = 0.0;
    for j in 0..rays {
        for i in 0..rays {
            let origin = Point3::new(
                0.01 + (i as f64 + 0.5) * step,
                0.01 + (j as f64 + 0.5) * step,
                1.0,
            );
            if let Some(hit) = collider.intersection(&Ray::new(origin, down)) {
                hits += 1;
                total_distance += hit.distance;
            }
        }
    }
    let elapsed = start.elapsed();

    println!("Rays: {} cast, {} hit in {:.2?}", cast, hits, elapsed);
    if hits > 0 {
        println!("  Mean distance: {:.4}", total_distance / hits as f64);
    }
    if cast > 0 {
        println!(
            "  Throughput: {:.0} rays/s",
            cast as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_mesh_bounds() {
        assert!(grid_mesh(0, false).is_err());
        assert!(grid_mesh(usize::MAX, false).is_err());
        assert!(grid_mesh(1 << 20, false).is_err());

        let mesh = grid_mesh(2, true).unwrap();
        assert_eq!(mesh.num_vertices(), 9);
        assert_eq!(mesh.num_faces(), 4);
    }

    #[test]
    fn test_raycast_rejects_oversized_arguments() {
        assert!(cmd_raycast(2, usize::MAX, 2, 16).is_err());
        assert!(cmd_raycast(2, 4, 2, usize::MAX).is_err());
        assert!(cmd_raycast(2, 4, 2, 16).is_ok());
    }
}
