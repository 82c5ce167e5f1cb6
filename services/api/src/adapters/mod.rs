pub mod script_llm;

pub use script_llm::OpenAiScriptAdapter;
