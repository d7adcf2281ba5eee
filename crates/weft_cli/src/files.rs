//! `weft files`: print the project's resolved source list.

use weft_compiler::IdentityCompiler;
use weft_project::Project;

use crate::pipeline::load_build_configuration;
use crate::GlobalArgs;

/// Runs the `weft files` command.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_build_configuration(global)?;
    let project = Project::new(config, Box::new(IdentityCompiler::new()));
    for path in project.resolve_sources()? {
        println!("{}", path.display());
    }
    Ok(0)
}
