//! CLI command structure using clap

use clap::{Args, Parser, Subcommand};
use latexlab_core::compile::LatexEngine;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "latexlab")]
#[command(version, about = "Render LaTeX documents from templates", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Template directory selection shared by every template command
#[derive(Args, Debug, Clone, Default)]
pub struct TemplateDirArg {
    /// Directory containing <name>.tex.j2 / <name>.yaml pairs
    #[arg(short = 't', long = "template-dir", env = "LATEXLAB_TEMPLATE_DIR")]
    pub template_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List available templates
    ListTemplates {
        #[command(flatten)]
        dir: TemplateDirArg,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a template's metadata and fields
    Info {
        /// Template name
        name: String,

        #[command(flatten)]
        dir: TemplateDirArg,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a template to a .tex file
    Generate {
        /// Template name
        name: String,

        /// Output .tex file
        output: PathBuf,

        #[command(flatten)]
        dir: TemplateDirArg,

        /// YAML or JSON file with variable values
        #[arg(long)]
        variables: Option<PathBuf>,

        /// Overwrite the output file if it exists
        #[arg(short, long)]
        force: bool,

        /// Compile the generated document
        #[arg(short, long)]
        compile: bool,

        /// LaTeX engine used with --compile
        #[arg(short, long)]
        engine: Option<LatexEngine>,
    },

    /// Create a template directory with example templates
    Init {
        #[command(flatten)]
        dir: TemplateDirArg,

        /// Replace existing example templates
        #[arg(short, long)]
        force: bool,
    },

    /// Create documents through guided prompts
    Interactive {
        #[command(flatten)]
        dir: TemplateDirArg,
    },

    /// Set up a project folder, import assets, render and compile
    UccsWorkflow {
        #[command(flatten)]
        dir: TemplateDirArg,

        /// Template to render
        #[arg(long, default_value = "homework")]
        template: String,

        /// YAML or JSON file with variable values (prompts when omitted)
        #[arg(long)]
        variables: Option<PathBuf>,

        /// Project folder (default: current directory)
        #[arg(short, long)]
        project_dir: Option<PathBuf>,

        /// Directory of font files to import
        #[arg(long)]
        fonts: Option<PathBuf>,

        /// Directory of image files to import
        #[arg(long)]
        images: Option<PathBuf>,

        /// LaTeX engine
        #[arg(short, long)]
        engine: Option<LatexEngine>,

        /// Only generate the .tex file
        #[arg(long)]
        no_compile: bool,

        /// Overwrite existing output and assets
        #[arg(short, long)]
        force: bool,
    },

    /// Compile a .tex file to PDF
    Compile {
        /// Path to the .tex file
        path: PathBuf,

        /// LaTeX engine
        #[arg(short, long)]
        engine: Option<LatexEngine>,

        /// Open the PDF when done
        #[arg(long)]
        open: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "latexlab",
            "generate",
            "homework",
            "out/hw.tex",
            "--variables",
            "vars.yaml",
            "--compile",
            "--engine",
            "xelatex",
            "-t",
            "tpl",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate {
                name,
                output,
                dir,
                variables,
                force,
                compile,
                engine,
            } => {
                assert_eq!(name, "homework");
                assert_eq!(output, PathBuf::from("out/hw.tex"));
                assert_eq!(dir.template_dir, Some(PathBuf::from("tpl")));
                assert_eq!(variables, Some(PathBuf::from("vars.yaml")));
                assert!(!force);
                assert!(compile);
                assert_eq!(engine, Some(LatexEngine::Xelatex));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_unknown_engine_is_rejected() {
        let result = Cli::try_parse_from(["latexlab", "compile", "a.tex", "--engine", "context"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_workflow_defaults() {
        let cli = Cli::try_parse_from(["latexlab", "uccs-workflow", "--no-compile"]).unwrap();
        match cli.command {
            Commands::UccsWorkflow {
                template,
                no_compile,
                project_dir,
                ..
            } => {
                assert_eq!(template, "homework");
                assert!(no_compile);
                assert!(project_dir.is_none());
            }
            _ => panic!("expected uccs-workflow"),
        }
    }
}
