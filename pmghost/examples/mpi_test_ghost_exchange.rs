//? mpirun -n {{NPROCESSES}} --features "mpi"

#[cfg(feature = "mpi")]
fn main() {
    use mpi::traits::Communicator;
    use pmghost::{
        traits::{comm::Collective, domain::Decomposition},
        AbortOnError, Arena, Attributes, GhostData, HaloMargin, Particles, ProcessGridBuilder,
    };
    use rand::prelude::*;

    let universe = mpi::initialize().unwrap();
    let world = universe.world();
    let rank = world.rank() as usize;
    let size = world.size() as usize;

    // Decomposition parameters
    let box_size = [100., 100., 100.];
    let n_mesh = [64, 64, 64];
    let process_mesh = [size, 1];
    let halo = HaloMargin::symmetric(1);

    // Particle parameters
    let n_particles = 10000;
    let capacity = 2 * n_particles;
    let arena_bytes = 64 << 20;

    let grid = ProcessGridBuilder::<f64>::new()
        .mesh(box_size, n_mesh)
        .and_then(|b| b.decomposition(process_mesh, rank))
        .and_then(|b| b.halo(halo))
        .and_then(|b| b.build())
        .or_abort(&world);

    // Generate some random particles local to each process
    let mut rng = StdRng::seed_from_u64(rank as u64);
    let (lower, upper) = grid.bounds(rank);
    let mut particles = Particles::<f64>::new(capacity);
    for i in 0..n_particles {
        let position = [
            rng.gen_range(lower[0]..upper[0]),
            rng.gen_range(lower[1]..upper[1]),
            rng.gen_range(lower[2]..upper[2]),
        ];
        let velocity = [rng.gen(), rng.gen(), rng.gen()];
        particles
            .push(position, velocity, (rank * n_particles + i) as u64)
            .or_abort(&world);
    }

    let mut arena = Arena::new(arena_bytes).or_abort(&world);

    let mut session = GhostData::new(&grid, &mut particles, n_particles);
    let n_ghosts = session
        .append_ghosts(&grid, &world, &mut arena, capacity, Attributes::all())
        .or_abort(&world);

    // Test that every ghost lies within one cell of this rank's region
    let cell_size = grid.cell_size();
    for ghost in n_particles..n_particles + n_ghosts {
        let x = session.particles().positions()[ghost][0];
        let below = (lower[0] - x).rem_euclid(box_size[0]);
        let above = (x - upper[0]).rem_euclid(box_size[0]);
        assert!(below <= cell_size[0] || above <= cell_size[0]);
        assert_ne!(grid.pos_to_rank(&session.particles().positions()[ghost]), Some(rank));
    }

    // Every copy of a particle contributes one unit of density to its owner
    session.particles_mut().densities_mut()[..n_particles + n_ghosts].fill(1.0);
    session
        .reduce_ghosts(&grid, &world, &mut arena, Attributes::DENSITY)
        .or_abort(&world);

    let n_copies: f64 = session.particles().densities()[..n_particles]
        .iter()
        .map(|density| density - 1.0)
        .sum();
    let n_sent = pmghost::ghost::helpers::total(session.send_counts());
    assert_eq!(n_copies as usize, n_sent);
    assert_eq!(arena.used_bytes(), 0);

    if Collective::this_rank(&world) == 0 {
        println!(
            "...test_ghost_exchange passed, {} ghosts on rank 0, peak arena usage {} bytes",
            n_ghosts,
            arena.peak_usage()
        );
    }
}

#[cfg(not(feature = "mpi"))]
fn main() {}
