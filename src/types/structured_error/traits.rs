use super::StructuredError;
use core::fmt::{self, Display};
use core::hash::{Hash, Hasher};

impl Display for StructuredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "Error: {} (code: {})", self.message, self.code)?;
            let mut source = self.cause.as_deref().map(|c| c as &(dyn std::error::Error + 'static));
            if source.is_some() {
                f.write_str("\nCaused by:")?;
            }
            while let Some(err) = source {
                match err.downcast_ref::<StructuredError>() {
                    Some(structured) => {
                        write!(f, "\n  - {} (code: {})", structured.message, structured.code)?
                    },
                    None => write!(f, "\n  - {}", err)?,
                }
                source = err.source();
            }
            return Ok(());
        }

        match &self.cause {
            Some(cause) => write!(f, "{}: {}", self.message, cause),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for StructuredError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_deref().map(|c| c as &(dyn std::error::Error + 'static))
    }
}

impl PartialEq for StructuredError {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for StructuredError {}

impl Hash for StructuredError {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}
