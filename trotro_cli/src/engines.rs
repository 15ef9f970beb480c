use comfy_table::{Table, presets::UTF8_FULL};
use trotro_optimizer::solver::{engine::Engine, solver_registry::SolverRegistry};

pub fn run() -> Result<(), anyhow::Error> {
    let registry = SolverRegistry::global();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Engine", "Name", "Linked", "Usable"]);

    for engine in Engine::ALL {
        table.add_row(vec![
            engine.display_name().to_owned(),
            engine.name().to_owned(),
            yes_no(engine.is_linked()).to_owned(),
            yes_no(registry.is_registered(engine)).to_owned(),
        ]);
    }

    println!("{table}");
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
