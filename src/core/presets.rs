//! Stack presets
//!
//! Builtin filter tables for common technology stacks. The registry is
//! immutable; callers receive it explicitly and read from it, nothing
//! mutates it after startup.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;

/// Filter table for one technology stack
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StackPreset {
    /// Extensions collected by default (no leading dot)
    pub extensions: &'static [&'static str],
    /// Folders this stack conventionally keeps sources in (informational)
    pub include_dirs: &'static [&'static str],
    /// Path segments pruned during traversal
    pub exclude: &'static [&'static str],
}

/// Immutable name -> preset table
#[derive(Debug)]
pub struct PresetRegistry {
    presets: BTreeMap<&'static str, StackPreset>,
}

impl PresetRegistry {
    /// The builtin registry shared by the whole process
    pub fn builtin() -> &'static PresetRegistry {
        &BUILTIN
    }

    pub fn get(&self, name: &str) -> Option<&StackPreset> {
        self.presets.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &StackPreset)> + '_ {
        self.presets.iter().map(|(name, preset)| (*name, preset))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.presets.keys().copied()
    }
}

static BUILTIN: Lazy<PresetRegistry> = Lazy::new(|| {
    let mut presets = BTreeMap::new();

    presets.insert(
        "java",
        StackPreset {
            extensions: &["java", "xml", "properties"],
            include_dirs: &["src"],
            exclude: &["target", ".git", ".idea", "bin", "out", "build", "lib"],
        },
    );

    presets.insert(
        "python",
        StackPreset {
            extensions: &["py"],
            include_dirs: &[".", "app"],
            exclude: &["__pycache__", ".venv", ".git", "build", "dist"],
        },
    );

    let dotnet = StackPreset {
        extensions: &["cs", "config", "csproj"],
        include_dirs: &["src", "app"],
        exclude: &["bin", "obj", ".vs", ".git"],
    };
    presets.insert("cs", dotnet);
    presets.insert("dotnet", dotnet);

    presets.insert(
        "cpp",
        StackPreset {
            extensions: &["cpp", "c", "h", "hpp"],
            include_dirs: &["src", "include"],
            exclude: &["build", "bin", ".git"],
        },
    );

    presets.insert(
        "c",
        StackPreset {
            extensions: &["c", "h"],
            include_dirs: &["src", "include"],
            exclude: &["build", "bin", ".git"],
        },
    );

    presets.insert(
        "rust",
        StackPreset {
            extensions: &["rs", "toml"],
            include_dirs: &["src"],
            exclude: &["target", ".git"],
        },
    );

    presets.insert(
        "js",
        StackPreset {
            extensions: &["js", "json", "ts"],
            include_dirs: &["src", "app"],
            exclude: &["node_modules", "dist", ".git"],
        },
    );

    presets.insert(
        "fullstack",
        StackPreset {
            extensions: &[
                // Backend
                "py", "java", "cs", "c", "cpp", "go", "rs", "php", "rb",
                // Frontend
                "js", "ts", "jsx", "tsx", "html", "htm", "css", "scss", "sass",
                // Config / Infra / DevOps
                "json", "yaml", "yml", "toml", "ini", "cfg", "env", "xml", "tf", "tfvars", "sh",
                "bat", "ps1",
                // Docs / Data / Misc
                "md", "txt", "csv", "tsv", "sql",
            ],
            include_dirs: &[
                "src",
                "app",
                ".",
                "frontend",
                "backend",
                "infra",
                "terraform",
                "pipelines",
            ],
            exclude: &[
                "node_modules",
                "dist",
                "build",
                "bin",
                "obj",
                "__pycache__",
                ".venv",
                ".git",
                ".idea",
                ".vscode",
                ".DS_Store",
                "coverage",
                ".pytest_cache",
                ".mypy_cache",
                ".next",
                ".parcel-cache",
                ".turbo",
                ".cache",
                ".nuxt",
                ".angular",
                "target",
            ],
        },
    );

    PresetRegistry { presets }
});
