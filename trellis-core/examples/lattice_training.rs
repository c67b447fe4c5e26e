//! Fits the arc weights of a small emission lattice so that one target
//! path dominates the total score: compose the lattice with a target
//! acceptor, forward-score both, and descend on the difference
//! (a miniature sequence criterion).

use trellis_core::{compose, forward, subtract, Graph};

// Symbols 1 and 2 over three time steps.
const STEPS: usize = 3;
const TARGET: [i32; STEPS] = [1, 2, 1];

fn emissions() -> Graph {
    let g = Graph::new();
    g.add_node(true, false);
    for step in 0..STEPS {
        g.add_node(false, step + 1 == STEPS);
        for symbol in [1, 2] {
            g.add_arc(step, step + 1, symbol, symbol, 0.0)
                .expect("emission arc");
        }
    }
    g
}

fn target_acceptor() -> Graph {
    let g = Graph::new();
    g.add_node(true, false);
    for (step, &symbol) in TARGET.iter().enumerate() {
        g.add_node(false, step + 1 == TARGET.len());
        g.add_arc(step, step + 1, symbol, symbol, 0.0)
            .expect("target arc");
    }
    g.set_calc_grad(false);
    g
}

fn main() -> Result<(), trellis_core::TrellisError> {
    let emissions = emissions();
    let target = target_acceptor();
    let learning_rate = 0.5;

    for iteration in 0..20 {
        // loss = full log-partition minus the target path's score.
        let target_score = forward(&compose(&emissions, &target)?)?;
        let total_score = forward(&emissions)?;
        let loss = subtract(&total_score, &target_score)?;

        emissions.zero_grad();
        loss.backward()?;

        let grads = emissions
            .grad()
            .expect("emissions participate in the tape")
            .weights();
        let weights: Vec<f32> = emissions
            .weights()
            .iter()
            .zip(&grads)
            .map(|(w, g)| w - learning_rate * g)
            .collect();
        emissions.set_weights(&weights)?;

        if iteration % 5 == 0 {
            println!("iteration {:2}: loss = {:.4}", iteration, loss.item()?);
        }
    }

    println!("final weights: {:?}", emissions.weights());
    Ok(())
}
