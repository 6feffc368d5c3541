use std::collections::HashMap;

use once_cell::sync::Lazy;

// Extension (lowercase, with dot) to Markdown code-fence language tag.
static EXTENSION_LANGUAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (".py", "python"),
        (".js", "javascript"),
        (".ts", "typescript"),
        (".jsx", "jsx"),
        (".tsx", "tsx"),
        (".java", "java"),
        (".kt", "kotlin"),
        (".kts", "kotlin"),
        (".cs", "csharp"),
        (".go", "go"),
        (".rs", "rust"),
        (".rb", "ruby"),
        (".php", "php"),
        (".swift", "swift"),
        (".c", "c"),
        (".h", "c"),
        (".cpp", "cpp"),
        (".hpp", "cpp"),
        (".cc", "cpp"),
        (".sh", "bash"),
        (".bash", "bash"),
        (".zsh", "zsh"),
        (".ps1", "powershell"),
        (".sql", "sql"),
        (".html", "html"),
        (".htm", "html"),
        (".css", "css"),
        (".scss", "scss"),
        (".sass", "sass"),
        (".less", "less"),
        (".xml", "xml"),
        (".json", "json"),
        (".yaml", "yaml"),
        (".yml", "yaml"),
        (".toml", "toml"),
        (".ini", "ini"),
        (".cfg", "ini"),
        (".md", "markdown"),
        (".markdown", "markdown"),
        (".rst", "rst"),
        (".tex", "latex"),
        (".r", "r"),
        (".scala", "scala"),
        (".lua", "lua"),
        (".pl", "perl"),
        (".pm", "perl"),
        (".ex", "elixir"),
        (".exs", "elixir"),
        (".erl", "erlang"),
        (".hs", "haskell"),
        (".dart", "dart"),
        (".vue", "vue"),
        (".svelte", "svelte"),
        (".tf", "hcl"),
        (".proto", "protobuf"),
        (".graphql", "graphql"),
        (".gql", "graphql"),
        (".dockerfile", "dockerfile"),
        (".makefile", "makefile"),
    ])
});

// Filenames with a known language regardless of extension. Checked first.
static FILENAME_LANGUAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Dockerfile", "dockerfile"),
        ("Makefile", "makefile"),
        ("Jenkinsfile", "groovy"),
        ("Vagrantfile", "ruby"),
        ("Gemfile", "ruby"),
        ("Rakefile", "ruby"),
        ("CMakeLists.txt", "cmake"),
        (".gitignore", "gitignore"),
        (".dockerignore", "gitignore"),
        (".editorconfig", "ini"),
    ])
});

/// Markdown code-fence language tag for a file path, "" if unknown.
///
/// Exact filename matches (Dockerfile, Makefile, dotfiles) take priority
/// over the extension lookup.
pub fn get_language_hint(path: &str) -> &'static str {
    let filename = path.rsplit('/').next().unwrap_or(path);
    if let Some(lang) = FILENAME_LANGUAGES.get(filename).copied() {
        return lang;
    }

    let ext = match path.rfind('.') {
        Some(pos) => path[pos..].to_ascii_lowercase(),
        None => return "",
    };
    EXTENSION_LANGUAGES.get(ext.as_str()).copied().unwrap_or("")
}
