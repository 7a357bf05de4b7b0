//! Command-line interface for treeq
//! This binary inspects source files under a grammar configuration: it prints
//! the lexed token stream as JSON or the parsed tree as indented text.
//!
//! Usage:
//!   treeq tokens `<path>` [--grammar `<config>`]  - Print the token stream as JSON
//!   treeq tree `<path>` [--grammar `<config>`]    - Print the parsed tree

use clap::{Arg, Command};
use std::path::Path;
use std::process::ExitCode;
use treeq::parsing::NodeId;
use treeq::{GrammarConfig, Language, Tree};

fn main() -> ExitCode {
    let grammar_arg = Arg::new("grammar")
        .long("grammar")
        .short('g')
        .help("Path to a JSON or YAML grammar configuration (default: builtin Python)");
    let path_arg = Arg::new("path")
        .help("Path to the source file")
        .required(true)
        .index(1);

    let matches = Command::new("treeq")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting source files as token streams and trees")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("tokens")
                .about("Print the lexed token stream as JSON")
                .arg(path_arg.clone())
                .arg(grammar_arg.clone()),
        )
        .subcommand(
            Command::new("tree")
                .about("Print the parsed tree")
                .arg(path_arg)
                .arg(grammar_arg),
        )
        .get_matches();

    let (name, sub) = matches.subcommand().expect("subcommand is required");
    let path = sub.get_one::<String>("path").expect("path is required");
    let grammar = sub.get_one::<String>("grammar");

    match run(name, path, grammar.map(String::as_str)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(command: &str, path: &str, grammar: Option<&str>) -> Result<(), String> {
    let custom;
    let language: &Language = match grammar {
        Some(config_path) => {
            custom = load_language(config_path)?;
            &custom
        }
        None => treeq::language::python(),
    };
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path, e))?;

    match command {
        "tokens" => {
            let tokens = language.tokenize(&source).map_err(|e| e.to_string())?;
            let json =
                serde_json::to_string_pretty(&tokens).map_err(|e| e.to_string())?;
            println!("{}", json);
        }
        "tree" => {
            let tree = language.parse(&source).map_err(|e| e.to_string())?;
            let mut out = String::new();
            render(&tree, tree.root_id(), 0, &mut out);
            print!("{}", out);
        }
        _ => unreachable!(),
    }
    Ok(())
}

fn load_language(config_path: &str) -> Result<Language, String> {
    let text = std::fs::read_to_string(config_path)
        .map_err(|e| format!("cannot read {}: {}", config_path, e))?;
    let is_yaml = Path::new(config_path)
        .extension()
        .map(|ext| ext == "yaml" || ext == "yml")
        .unwrap_or(false);
    let config = if is_yaml {
        GrammarConfig::from_yaml_str(&text)
    } else {
        GrammarConfig::from_json_str(&text)
    }
    .map_err(|e| e.to_string())?;
    Language::new(&config).map_err(|e| e.to_string())
}

fn render(tree: &Tree, id: NodeId, depth: usize, out: &mut String) {
    let node = tree.node(id);
    out.push_str(&"    ".repeat(depth));
    out.push_str(&format!("{}\n", node.token()));
    for &child in node.children() {
        render(tree, child, depth + 1, out);
    }
}
