//! skillsync new - create a canonical skill from a template

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::error::Result;
use crate::scaffold::{DEFAULT_TEMPLATE, NewSkill, create_skill};

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Skill name (becomes skills/<NAME>)
    pub name: String,

    /// Template directory under templates/
    #[arg(long, short, default_value = DEFAULT_TEMPLATE)]
    pub template: String,

    /// One-line description written into the skill
    #[arg(long, short)]
    pub description: Option<String>,

    /// Replace an existing skill of the same name
    #[arg(long)]
    pub force: bool,
}

pub fn run(ctx: &AppContext, args: &NewArgs) -> Result<()> {
    let mut request = NewSkill::new(&args.name);
    request.template.clone_from(&args.template);
    request.force = args.force;
    if let Some(description) = &args.description {
        request.description.clone_from(description);
    }

    let created = create_skill(ctx.root(), &request, &ctx.policy)?;

    if ctx.robot_mode {
        return emit_json(&robot_ok(&created));
    }

    let mut layout = HumanLayout::new();
    layout
        .title("New skill")
        .kv("Name", &args.name)
        .kv("Path", &created.skill_dir.display().to_string())
        .kv(
            "Template",
            &if created.builtin {
                format!("{} (built-in)", created.template)
            } else {
                created.template.clone()
            },
        )
        .kv("Files", &created.files.to_string())
        .blank()
        .push_line(format!(
            "Add `{}` to a bundle under {} to install it.",
            args.name,
            ctx.root().bundles_dir().display()
        ));
    emit_human(layout);
    Ok(())
}
