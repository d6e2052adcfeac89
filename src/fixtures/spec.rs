//! Test specifications and generator functions

use std::{fmt, future::Future, pin::Pin, sync::Arc};

use super::vfile::VFile;
use crate::error::BoxError;

/// Default logical name of a fixture's input file
pub const DEFAULT_INPUT: &str = "input";

/// Value produced by a generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generated {
   Text(String),
   Bytes(Vec<u8>),
   File(VFile),
}

impl Generated {
   /// Coerce the generated value to text. Bytes are decoded lossily.
   pub fn into_text(self) -> String {
      match self {
         Self::Text(text) => text,
         Self::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
         },
         Self::File(file) => file.value,
      }
   }
}

impl From<String> for Generated {
   fn from(text: String) -> Self {
      Self::Text(text)
   }
}

impl From<&str> for Generated {
   fn from(text: &str) -> Self {
      Self::Text(text.to_string())
   }
}

impl From<Vec<u8>> for Generated {
   fn from(bytes: Vec<u8>) -> Self {
      Self::Bytes(bytes)
   }
}

impl From<VFile> for Generated {
   fn from(file: VFile) -> Self {
      Self::File(file)
   }
}

pub type GenerateFuture = Pin<Box<dyn Future<Output = Result<Generated, BoxError>> + Send>>;

type GenerateFn<O> = dyn Fn(VFile, O) -> GenerateFuture + Send + Sync;

/// A function turning a fixture's input file and options into actual output.
pub struct Generate<O> {
   inner: Arc<GenerateFn<O>>,
}

impl<O: 'static> Generate<O> {
   /// Wrap an async generator.
   pub fn new<F, Fut, T, E>(f: F) -> Self
   where
      F: Fn(VFile, O) -> Fut + Send + Sync + 'static,
      Fut: Future<Output = Result<T, E>> + Send + 'static,
      T: Into<Generated>,
      E: Into<BoxError>,
   {
      Self {
         inner: Arc::new(move |file: VFile, options: O| -> GenerateFuture {
            let fut = f(file, options);
            Box::pin(async move {
               let result: Result<Generated, BoxError> =
                  fut.await.map(Into::into).map_err(Into::into);
               result
            })
         }),
      }
   }

   /// Wrap a synchronous generator that cannot fail.
   pub fn sync<F, T>(f: F) -> Self
   where
      F: Fn(VFile, O) -> T + Send + Sync + 'static,
      T: Into<Generated>,
   {
      Self {
         inner: Arc::new(move |file: VFile, options: O| -> GenerateFuture {
            let generated = f(file, options).into();
            Box::pin(async move { Ok::<_, BoxError>(generated) })
         }),
      }
   }

   /// Wrap a synchronous generator that may fail.
   pub fn try_sync<F, T, E>(f: F) -> Self
   where
      F: Fn(VFile, O) -> Result<T, E> + Send + Sync + 'static,
      T: Into<Generated>,
      E: Into<BoxError>,
   {
      Self {
         inner: Arc::new(move |file: VFile, options: O| -> GenerateFuture {
            let result: Result<Generated, BoxError> =
               f(file, options).map(Into::into).map_err(Into::into);
            Box::pin(async move { result })
         }),
      }
   }
}

impl<O> Generate<O> {
   pub(crate) fn call(&self, file: VFile, options: O) -> GenerateFuture {
      (self.inner)(file, options)
   }
}

impl<O> Clone for Generate<O> {
   fn clone(&self) -> Self {
      Self { inner: Arc::clone(&self.inner) }
   }
}

impl<O> fmt::Debug for Generate<O> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str("Generate(..)")
   }
}

/// A test to run against every fixture directory.
#[derive(Debug, Clone)]
pub enum TestSpec<O> {
   /// Input is `input`, the baseline is named after the test
   Bare(Generate<O>),
   /// Explicit input and baseline names
   Configured {
      /// Input file name. With an extension it names an exact file, without
      /// one it matches the first file whose stem equals it.
      input:    Option<String>,
      /// Baseline file name, defaults to the test name
      expected: Option<String>,
      generate: Generate<O>,
   },
}

impl<O> TestSpec<O> {
   /// A configured spec with no overrides yet.
   pub const fn configured(generate: Generate<O>) -> Self {
      Self::Configured { input: None, expected: None, generate }
   }

   /// Override the input file name.
   pub fn with_input(self, name: impl Into<String>) -> Self {
      match self {
         Self::Bare(generate) => {
            Self::Configured { input: Some(name.into()), expected: None, generate }
         },
         Self::Configured { expected, generate, .. } => {
            Self::Configured { input: Some(name.into()), expected, generate }
         },
      }
   }

   /// Override the baseline file name.
   pub fn with_expected(self, name: impl Into<String>) -> Self {
      match self {
         Self::Bare(generate) => {
            Self::Configured { input: None, expected: Some(name.into()), generate }
         },
         Self::Configured { input, generate, .. } => {
            Self::Configured { input, expected: Some(name.into()), generate }
         },
      }
   }

   /// Resolve defaults against the test name.
   pub fn normalize(&self, test_name: &str) -> NormalizedTest<O> {
      match self {
         Self::Bare(generate) => NormalizedTest {
            input:    DEFAULT_INPUT.to_string(),
            expected: test_name.to_string(),
            generate: generate.clone(),
         },
         Self::Configured { input, expected, generate } => NormalizedTest {
            input:    input.clone().unwrap_or_else(|| DEFAULT_INPUT.to_string()),
            expected: expected.clone().unwrap_or_else(|| test_name.to_string()),
            generate: generate.clone(),
         },
      }
   }
}

impl<O> From<Generate<O>> for TestSpec<O> {
   fn from(generate: Generate<O>) -> Self {
      Self::Bare(generate)
   }
}

/// A test spec with all names filled in.
#[derive(Debug, Clone)]
pub struct NormalizedTest<O> {
   pub input:    String,
   pub expected: String,
   pub generate: Generate<O>,
}

#[cfg(test)]
mod tests {
   use super::*;

   fn echo() -> Generate<()> {
      Generate::sync(|file: VFile, ()| file.value)
   }

   #[test]
   fn test_bare_spec_defaults() {
      let spec = TestSpec::Bare(echo());
      let normalized = spec.normalize("output.txt");
      assert_eq!(normalized.input, "input");
      assert_eq!(normalized.expected, "output.txt");
   }

   #[test]
   fn test_configured_spec_overrides() {
      let spec = TestSpec::configured(echo())
         .with_input("custom-input.txt")
         .with_expected("custom-output.txt");
      let normalized = spec.normalize("custom-io");
      assert_eq!(normalized.input, "custom-input.txt");
      assert_eq!(normalized.expected, "custom-output.txt");
   }

   #[test]
   fn test_configured_spec_falls_back_to_defaults() {
      let normalized = TestSpec::configured(echo()).normalize("test-object.txt");
      assert_eq!(normalized.input, "input");
      assert_eq!(normalized.expected, "test-object.txt");
   }

   #[test]
   fn test_generated_into_text() {
      assert_eq!(Generated::from("a").into_text(), "a");
      assert_eq!(Generated::from(b"bytes".to_vec()).into_text(), "bytes");
      assert_eq!(Generated::from(vec![0x66_u8, 0xff]).into_text(), "f\u{FFFD}");
      assert_eq!(Generated::from(VFile::new("x", "from file")).into_text(), "from file");
   }

   #[tokio::test]
   async fn test_generate_variants() {
      let file = VFile::new("input", "in");

      let sync = echo();
      assert_eq!(sync.call(file.clone(), ()).await.unwrap(), Generated::from("in"));

      let fallible: Generate<()> =
         Generate::try_sync(|_: VFile, ()| Err::<String, _>("boom".to_string()));
      let err = fallible.call(file.clone(), ()).await.unwrap_err();
      assert_eq!(err.to_string(), "boom");

      let async_gen: Generate<()> = Generate::new(|file: VFile, ()| async move {
         Ok::<_, std::io::Error>(file.value.to_uppercase())
      });
      assert_eq!(async_gen.call(file, ()).await.unwrap(), Generated::from("IN"));
   }
}
