use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    drupal-composer-builder completions --shell bash > ~/.bash_completion.d/drupal-composer-builder\n\n\
                  Generate zsh completions:\n    drupal-composer-builder completions --shell zsh > ~/.zfunc/_drupal-composer-builder\n\n\
                  Generate fish completions:\n    drupal-composer-builder completions --shell fish > ~/.config/fish/completions/drupal-composer-builder.fish")]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(long, short = 's', value_enum, ignore_case = true)]
    pub shell: Shell,
}
