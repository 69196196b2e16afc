//! User-facing text in English, Spanish and Portuguese.
//!
//! Every string is addressed by a [`Msg`] variant, so a missing translation
//! is a compile error rather than a runtime fallback. Templates use `{0}`,
//! `{1}`, ... for positional arguments.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::grammar::CommitType;

/// Display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Pt,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Pt => "pt",
        }
    }
}

/// Identifier of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    // commit
    SelectType,
    EnterSubject,
    SubjectRequired,
    EnterScope,
    IsBreaking,
    EnterBody,
    CreatingCommit,
    CommitCreated,
    NothingToCommit,
    // init
    InitStart,
    InitDone,
    // errors
    InvalidType,
    MissingSubject,
    UnknownCommit,
    GatewayFailure,
    PromptFailure,
    // format-commits
    NoCommits,
    FoundCommits,
    AlreadyConventional,
    SuggestedChange,
    AllConventional,
    ReviewingCommit,
    OriginalCommit,
    SuggestedCommit,
    CommitAction,
    AcceptSuggestion,
    EditSuggestion,
    SkipCommit,
    NoCommitsSelected,
    Summary,
    ConfirmRewrite,
    OperationCancelled,
    ApplyingChanges,
    UpdatedCommit,
    ErrorUpdating,
    ConversionComplete,
    ForcePushWarning,
    // config
    CurrentLanguage,
    CurrentMode,
    ConfigPath,
}

impl Msg {
    fn en(self) -> &'static str {
        match self {
            Self::SelectType => "Select the type of change",
            Self::EnterSubject => "Short description of the change",
            Self::SubjectRequired => "A description is required",
            Self::EnterScope => "Scope of the change (optional)",
            Self::IsBreaking => "Is this a breaking change?",
            Self::EnterBody => "Longer description (optional)",
            Self::CreatingCommit => "📝 Creating commit: \"{0}\"",
            Self::CommitCreated => "✅ Commit created.",
            Self::NothingToCommit => "Nothing to commit, working tree clean.",
            Self::InitStart => "📂 Initializing git repository...",
            Self::InitDone => "✅ Repository initialized with an empty first commit.",
            Self::InvalidType => "Invalid commit type '{0}'. Valid types: {1}",
            Self::MissingSubject => {
                "A commit description is required in non-interactive mode (pass it as an argument or with --description)."
            }
            Self::UnknownCommit => "Commit '{0}' does not exist or is not reachable.",
            Self::GatewayFailure => "Git operation failed: {0}",
            Self::PromptFailure => "Prompt error: {0}",
            Self::NoCommits => "No commits found in the given range.",
            Self::FoundCommits => "Found {0} commit(s) to analyze.",
            Self::AlreadyConventional => "✓ {0}: \"{1}\" is already conventional",
            Self::SuggestedChange => "→ {0}: \"{1}\" => \"{2}\"",
            Self::AllConventional => "All commits already follow the conventional format. Nothing to do.",
            Self::ReviewingCommit => "Reviewing commit {0} of {1}",
            Self::OriginalCommit => "Original:  {0}",
            Self::SuggestedCommit => "Suggested: {0}",
            Self::CommitAction => "What do you want to do with this commit?",
            Self::AcceptSuggestion => "Accept suggestion",
            Self::EditSuggestion => "Edit suggestion",
            Self::SkipCommit => "Skip this commit",
            Self::NoCommitsSelected => "No commits selected for rewriting.",
            Self::Summary => "Commits that will be rewritten:",
            Self::ConfirmRewrite => "Rewrite {0} commit(s)? This changes history.",
            Self::OperationCancelled => "Operation cancelled. No changes made.",
            Self::ApplyingChanges => "Applying changes...",
            Self::UpdatedCommit => "✅ Updated {0}",
            Self::ErrorUpdating => "❌ Error updating {0}: {1}",
            Self::ConversionComplete => "Done: {0} rewritten, {1} failed.",
            Self::ForcePushWarning => {
                "⚠ History was rewritten. Anyone with a copy of this branch must force-sync (e.g. `git push --force-with-lease`)."
            }
            Self::CurrentLanguage => "Language: {0}",
            Self::CurrentMode => "Interaction mode: {0}",
            Self::ConfigPath => "Config file: {0}",
        }
    }

    fn es(self) -> &'static str {
        match self {
            Self::SelectType => "Selecciona el tipo de cambio",
            Self::EnterSubject => "Descripción corta del cambio",
            Self::SubjectRequired => "La descripción es obligatoria",
            Self::EnterScope => "Ámbito del cambio (opcional)",
            Self::IsBreaking => "¿Es un cambio incompatible?",
            Self::EnterBody => "Descripción larga (opcional)",
            Self::CreatingCommit => "📝 Generando commit: \"{0}\"",
            Self::CommitCreated => "✅ Commit creado con éxito.",
            Self::NothingToCommit => "No hay nada para hacer commit, el árbol de trabajo está limpio.",
            Self::InitStart => "📂 Inicializando repositorio Git...",
            Self::InitDone => "✅ Repositorio inicializado con un primer commit vacío.",
            Self::InvalidType => "Tipo de commit inválido '{0}'. Tipos válidos: {1}",
            Self::MissingSubject => {
                "Se requiere una descripción en modo no interactivo (pásala como argumento o con --description)."
            }
            Self::UnknownCommit => "El commit '{0}' no existe o no es alcanzable.",
            Self::GatewayFailure => "Falló la operación de Git: {0}",
            Self::PromptFailure => "Error en la pregunta: {0}",
            Self::NoCommits => "No se encontraron commits en el rango indicado.",
            Self::FoundCommits => "Se encontraron {0} commit(s) para analizar.",
            Self::AlreadyConventional => "✓ {0}: \"{1}\" ya es convencional",
            Self::SuggestedChange => "→ {0}: \"{1}\" => \"{2}\"",
            Self::AllConventional => "Todos los commits ya siguen el formato convencional. Nada que hacer.",
            Self::ReviewingCommit => "Revisando commit {0} de {1}",
            Self::OriginalCommit => "Original:  {0}",
            Self::SuggestedCommit => "Sugerido:  {0}",
            Self::CommitAction => "¿Qué quieres hacer con este commit?",
            Self::AcceptSuggestion => "Aceptar sugerencia",
            Self::EditSuggestion => "Editar sugerencia",
            Self::SkipCommit => "Omitir este commit",
            Self::NoCommitsSelected => "No se seleccionaron commits para reescribir.",
            Self::Summary => "Commits que serán reescritos:",
            Self::ConfirmRewrite => "¿Reescribir {0} commit(s)? Esto cambia el historial.",
            Self::OperationCancelled => "Operación cancelada. No se hicieron cambios.",
            Self::ApplyingChanges => "Aplicando cambios...",
            Self::UpdatedCommit => "✅ Actualizado {0}",
            Self::ErrorUpdating => "❌ Error al actualizar {0}: {1}",
            Self::ConversionComplete => "Listo: {0} reescrito(s), {1} fallido(s).",
            Self::ForcePushWarning => {
                "⚠ Se reescribió el historial. Quien tenga una copia de esta rama debe sincronizar forzadamente (p. ej. `git push --force-with-lease`)."
            }
            Self::CurrentLanguage => "Idioma: {0}",
            Self::CurrentMode => "Modo de interacción: {0}",
            Self::ConfigPath => "Archivo de configuración: {0}",
        }
    }

    fn pt(self) -> &'static str {
        match self {
            Self::SelectType => "Selecione o tipo de alteração",
            Self::EnterSubject => "Descrição curta da alteração",
            Self::SubjectRequired => "A descrição é obrigatória",
            Self::EnterScope => "Escopo da alteração (opcional)",
            Self::IsBreaking => "É uma alteração incompatível?",
            Self::EnterBody => "Descrição longa (opcional)",
            Self::CreatingCommit => "📝 Criando commit: \"{0}\"",
            Self::CommitCreated => "✅ Commit criado com sucesso.",
            Self::NothingToCommit => "Nada para commitar, a árvore de trabalho está limpa.",
            Self::InitStart => "📂 Inicializando repositório Git...",
            Self::InitDone => "✅ Repositório inicializado com um primeiro commit vazio.",
            Self::InvalidType => "Tipo de commit inválido '{0}'. Tipos válidos: {1}",
            Self::MissingSubject => {
                "Uma descrição é obrigatória no modo não interativo (passe como argumento ou com --description)."
            }
            Self::UnknownCommit => "O commit '{0}' não existe ou não é alcançável.",
            Self::GatewayFailure => "A operação do Git falhou: {0}",
            Self::PromptFailure => "Erro na pergunta: {0}",
            Self::NoCommits => "Nenhum commit encontrado no intervalo informado.",
            Self::FoundCommits => "Encontrado(s) {0} commit(s) para analisar.",
            Self::AlreadyConventional => "✓ {0}: \"{1}\" já é convencional",
            Self::SuggestedChange => "→ {0}: \"{1}\" => \"{2}\"",
            Self::AllConventional => "Todos os commits já seguem o formato convencional. Nada a fazer.",
            Self::ReviewingCommit => "Revisando commit {0} de {1}",
            Self::OriginalCommit => "Original:  {0}",
            Self::SuggestedCommit => "Sugerido:  {0}",
            Self::CommitAction => "O que deseja fazer com este commit?",
            Self::AcceptSuggestion => "Aceitar sugestão",
            Self::EditSuggestion => "Editar sugestão",
            Self::SkipCommit => "Pular este commit",
            Self::NoCommitsSelected => "Nenhum commit selecionado para reescrever.",
            Self::Summary => "Commits que serão reescritos:",
            Self::ConfirmRewrite => "Reescrever {0} commit(s)? Isso altera o histórico.",
            Self::OperationCancelled => "Operação cancelada. Nenhuma alteração feita.",
            Self::ApplyingChanges => "Aplicando alterações...",
            Self::UpdatedCommit => "✅ Atualizado {0}",
            Self::ErrorUpdating => "❌ Erro ao atualizar {0}: {1}",
            Self::ConversionComplete => "Concluído: {0} reescrito(s), {1} com falha.",
            Self::ForcePushWarning => {
                "⚠ O histórico foi reescrito. Quem tiver uma cópia deste branch deve sincronizar à força (ex.: `git push --force-with-lease`)."
            }
            Self::CurrentLanguage => "Idioma: {0}",
            Self::CurrentMode => "Modo de interação: {0}",
            Self::ConfigPath => "Arquivo de configuração: {0}",
        }
    }
}

/// Message lookup bound to one language.
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog {
    language: Language,
}

impl Catalog {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// The raw template for `msg`.
    pub fn text(&self, msg: Msg) -> &'static str {
        match self.language {
            Language::En => msg.en(),
            Language::Es => msg.es(),
            Language::Pt => msg.pt(),
        }
    }

    /// The template for `msg` with `{n}` replaced by `args[n]`.
    ///
    /// Placeholders without a matching argument are left as they are.
    pub fn format(&self, msg: Msg, args: &[&dyn Display]) -> String {
        substitute(self.text(msg), args)
    }

    /// One-line explanation of a commit type, shown in the type picker.
    pub fn type_description(&self, t: CommitType) -> &'static str {
        match (self.language, t) {
            (Language::En, CommitType::Feat) => "A new feature",
            (Language::En, CommitType::Fix) => "A bug fix",
            (Language::En, CommitType::Docs) => "Documentation only changes",
            (Language::En, CommitType::Style) => "Formatting, missing semicolons, whitespace",
            (Language::En, CommitType::Refactor) => "A change that neither fixes a bug nor adds a feature",
            (Language::En, CommitType::Perf) => "A change that improves performance",
            (Language::En, CommitType::Test) => "Adding or correcting tests",
            (Language::En, CommitType::Build) => "Build system or external dependencies",
            (Language::En, CommitType::Ci) => "CI configuration and scripts",
            (Language::En, CommitType::Chore) => "Other changes that don't modify src or tests",
            (Language::En, CommitType::Revert) => "Reverts a previous commit",
            (Language::Es, CommitType::Feat) => "Una nueva funcionalidad",
            (Language::Es, CommitType::Fix) => "Corrección de un error",
            (Language::Es, CommitType::Docs) => "Cambios solo en la documentación",
            (Language::Es, CommitType::Style) => "Formato, punto y coma, espacios",
            (Language::Es, CommitType::Refactor) => "Cambio que no corrige errores ni añade funcionalidad",
            (Language::Es, CommitType::Perf) => "Cambio que mejora el rendimiento",
            (Language::Es, CommitType::Test) => "Añadir o corregir pruebas",
            (Language::Es, CommitType::Build) => "Sistema de compilación o dependencias externas",
            (Language::Es, CommitType::Ci) => "Configuración y scripts de CI",
            (Language::Es, CommitType::Chore) => "Otros cambios que no modifican src ni pruebas",
            (Language::Es, CommitType::Revert) => "Revierte un commit anterior",
            (Language::Pt, CommitType::Feat) => "Uma nova funcionalidade",
            (Language::Pt, CommitType::Fix) => "Correção de um bug",
            (Language::Pt, CommitType::Docs) => "Alterações apenas na documentação",
            (Language::Pt, CommitType::Style) => "Formatação, ponto e vírgula, espaços",
            (Language::Pt, CommitType::Refactor) => "Alteração que não corrige bug nem adiciona funcionalidade",
            (Language::Pt, CommitType::Perf) => "Alteração que melhora o desempenho",
            (Language::Pt, CommitType::Test) => "Adicionar ou corrigir testes",
            (Language::Pt, CommitType::Build) => "Sistema de build ou dependências externas",
            (Language::Pt, CommitType::Ci) => "Configuração e scripts de CI",
            (Language::Pt, CommitType::Chore) => "Outras alterações que não modificam src ou testes",
            (Language::Pt, CommitType::Revert) => "Reverte um commit anterior",
        }
    }
}

fn substitute(template: &str, args: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let arg = after.find('}').and_then(|close| {
            let index = after[..close].parse::<usize>().ok()?;
            args.get(index).map(|a| (a.to_string(), close))
        });
        match arg {
            Some((text, close)) => {
                out.push_str(&text);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
