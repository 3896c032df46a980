//! # Erros do Pipeline de Anotação
//!
//! Todas as falhas do pipeline são fatais para a chamada corrente: ou a sentença
//! inteira é analisada, ou a chamada falha. Não existe resultado parcial.
//!
//! | Variante                    | Quando ocorre                                              |
//! |-----------------------------|------------------------------------------------------------|
//! | `BackendUnavailable`        | Nenhum modelo compatível foi encontrado                    |
//! | `MissingLinguisticResource` | O recurso de segmentação de sentenças não foi encontrado   |
//! | `InvalidBackend`            | O analisador fornecido não atende ao modo escolhido        |
//! | `InvalidInput`              | Modo desconhecido, campo de entrada que não é texto, etc.  |
//!
//! Os avisos não fatais (ex: segmentador padrão em uso) são emitidos via `tracing`
//! e nunca aparecem aqui.

use std::path::PathBuf;

use thiserror::Error;

/// Tipo `Result` usado em todo o crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// O modelo (backend) não pôde ser localizado. Não adianta repetir a chamada:
    /// o ambiente precisa ser corrigido seguindo a instrução em `directive`.
    #[error("modelo '{model}' indisponível: {directive}")]
    BackendUnavailable { model: String, directive: String },

    /// Equivalente ao anterior, mas para o recurso de segmentação de sentenças.
    #[error("recurso linguístico '{resource}' ausente: {directive}")]
    MissingLinguisticResource { resource: String, directive: String },

    /// O analisador não tem a capacidade exigida pelo modo, ou produziu uma
    /// árvore estruturalmente inválida.
    #[error("backend inválido: {0}")]
    InvalidBackend(String),

    #[error("entrada inválida: {0}")]
    InvalidInput(String),

    /// Um arquivo de recurso foi encontrado, mas não pôde ser interpretado.
    #[error("recurso corrompido em {path}: {source}")]
    Resource {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Falha ao converter o resultado para JSON ao gravá-lo num item do corpus.
    #[error("erro de serialização: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("erro de E/S: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_backend(msg: impl Into<String>) -> Self {
        Error::InvalidBackend(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Indica se o erro exige intervenção no ambiente (instalar modelo/recurso)
    /// em vez de uma correção na chamada.
    pub fn requires_remediation(&self) -> bool {
        matches!(
            self,
            Error::BackendUnavailable { .. } | Error::MissingLinguisticResource { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_unavailable_message_carries_directive() {
        let err = Error::BackendUnavailable {
            model: "en_core_rules".into(),
            directive: "copie o arquivo para models/".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("en_core_rules"));
        assert!(msg.contains("models/"));
        assert!(err.requires_remediation());
    }

    #[test]
    fn test_invalid_backend_is_not_remediation() {
        assert!(!Error::invalid_backend("sem tagger").requires_remediation());
    }
}
