use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    sitepack completions bash > ~/.bash_completion.d/sitepack\n\n\
                  Generate zsh completions:\n    sitepack completions zsh > ~/.zfunc/_sitepack\n\n\
                  Generate fish completions:\n    sitepack completions fish > ~/.config/fish/completions/sitepack.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
