//! Answer resolution shared by `generate` and `diff`.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use scaffold_core::config::{self, Answers};
use scaffold_renderer::{RenderContext, TemplateSpec};

/// Where variable answers come from.
#[derive(Args, Debug, Default)]
pub struct ContextArgs {
    /// User config file (default: ~/.scaffold/config.yaml).
    #[arg(long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Reuse the answers saved by the last generation of this template.
    #[arg(long)]
    pub replay: bool,
}

/// A loaded template and the context to render it with.
pub struct Resolved {
    pub spec: TemplateSpec,
    pub ctx: RenderContext,
}

impl Resolved {
    /// Answers keyed by variable, as saved for `--replay`.
    pub fn answers(&self) -> Answers {
        self.ctx.answers.iter().cloned().collect()
    }
}

/// Load the template and layer defaults, user config, replay answers and
/// (when `interactive`) answers typed on stdin.
pub fn resolve(template_dir: &Path, args: &ContextArgs, interactive: bool) -> Result<Resolved> {
    let spec = TemplateSpec::load(template_dir)
        .with_context(|| format!("failed to load template '{}'", template_dir.display()))?;
    let user = config::load_user_config(args.config_file.as_deref())
        .context("failed to load user config")?;
    let replay = if args.replay {
        let saved = config::load_replay(&spec.name)
            .with_context(|| format!("cannot replay template '{}'", spec.name))?;
        Some(saved.context)
    } else {
        None
    };

    let mut answers = config::resolve_answers(&spec.default_answers(), &user, replay.as_ref());
    if interactive && !spec.variables.is_empty() {
        let stdin = io::stdin();
        let stdout = io::stdout();
        prompt_variables(&spec, &mut answers, &mut stdin.lock(), &mut stdout.lock())
            .context("failed to read template answers")?;
    }

    let ctx = RenderContext::new(&spec, answers);
    Ok(Resolved { spec, ctx })
}

/// Ask for each variable in declaration order; an empty line keeps the
/// current value. Stops asking at end of input.
pub fn prompt_variables<R, W>(
    spec: &TemplateSpec,
    answers: &mut [(String, String)],
    input: &mut R,
    output: &mut W,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    for (var, (_, value)) in spec.variables.iter().zip(answers.iter_mut()) {
        write!(output, "{} [{}]: ", var.prompt_text(), value)?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if !line.is_empty() {
            *value = line.to_string();
        }
    }
    Ok(())
}
