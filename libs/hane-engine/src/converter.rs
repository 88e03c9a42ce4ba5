use hane_api::entity::Entity;
use hane_api::value::{self, Fields, Value};
use hane_api::{case, ConversionInput, Convert, ConvertError, Includes, RequestParams, Shape, Transformer};

/// Post-conversion hook. Receives the final result and the detected shape;
/// whatever it does, the conversion result is returned unchanged.
pub type Callback = Box<dyn FnOnce(&Value, Shape)>;

/// One conversion request: data plus the rules to apply to it.
///
/// Built fresh per request and consumed by [`Converter::convert`]:
///
/// ```ignore
/// let output = Converter::collection(PostTransformer, posts)
///     .only(["id", "title"])
///     .wrap("data")
///     .attach(fields! { "total" => 2 })
///     .convert(&RequestParams::from_query("include=author"))?;
/// ```
pub struct Converter<T: Transformer> {
    transformer: T,
    input: ConversionInput<T::Entity>,
    /// Field whitelist. Empty = keep everything `to_fields` produced.
    only: Vec<String>,
    /// Envelope key.
    wrap: Option<String>,
    /// Merged next to the envelope key; ignored without an envelope.
    attach: Fields,
    callback: Option<Callback>,
}

impl<T: Transformer> Converter<T> {
    pub fn new(transformer: T, input: ConversionInput<T::Entity>) -> Self {
        Self {
            transformer,
            input,
            only: Vec::new(),
            wrap: None,
            attach: Fields::new(),
            callback: None,
        }
    }

    pub fn entity(transformer: T, entity: T::Entity) -> Self {
        Self::new(transformer, ConversionInput::Entity(entity))
    }

    pub fn collection(transformer: T, items: Vec<T::Entity>) -> Self {
        Self::new(transformer, ConversionInput::Collection(items))
    }

    pub fn raw(transformer: T, value: Value) -> Self {
        Self::new(transformer, ConversionInput::Raw(value))
    }

    /// Keep only these fields of each converted entity.
    pub fn only<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Wrap the result as `{ key: result }`.
    pub fn wrap(mut self, key: impl Into<String>) -> Self {
        self.wrap = Some(key.into());
        self
    }

    /// Extra entries placed next to the envelope key.
    pub fn attach(mut self, attachments: Fields) -> Self {
        self.attach = attachments;
        self
    }

    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&Value, Shape) + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn shape(&self) -> Shape {
        self.input.shape()
    }

    pub fn transformer(&self) -> &T {
        &self.transformer
    }
}

impl<T> Converter<T>
where
    T: Transformer,
    T::Entity: Entity,
{
    /// Run the conversion.
    ///
    /// Raw input passes through, an entity becomes a field mapping, a
    /// collection becomes a sequence of mappings or, when the caller asks
    /// for a collection key, a mapping keyed by that attribute. The result
    /// is then enveloped (with attachments) if a wrap key is set, and
    /// finally handed to the callback.
    pub fn convert(self, params: &RequestParams) -> Result<Value, ConvertError> {
        let Converter {
            transformer,
            input,
            only,
            wrap,
            attach,
            callback,
        } = self;

        let shape = input.shape();
        let pass = Pass::new(&transformer, &only, params);

        let mut converted = match input {
            ConversionInput::Raw(raw) => raw,
            ConversionInput::Collection(items) => pass.collection(&items)?,
            ConversionInput::Entity(entity) => Value::Object(pass.entity_to_output(&entity)?),
        };

        if let Some(key) = wrap {
            let mut envelope = Fields::new();
            envelope.insert(key, converted);
            if !attach.is_empty() {
                value::merge(&mut envelope, attach);
            }
            converted = Value::Object(envelope);
        }

        tracing::debug!(converter = %transformer.name(), ?shape, "converted");

        if let Some(callback) = callback {
            callback(&converted, shape);
        }

        Ok(converted)
    }
}

impl<T> Convert for Converter<T>
where
    T: Transformer,
    T::Entity: Entity,
{
    fn convert_boxed(self: Box<Self>, params: &RequestParams) -> Result<Value, ConvertError> {
        (*self).convert(params)
    }
}

// ---------------------------------------------------------------------------
// Per-entity work shared by the entity and collection paths
// ---------------------------------------------------------------------------

struct Pass<'p, T: Transformer> {
    transformer: &'p T,
    only: &'p [String],
    params: &'p RequestParams,
    /// Requested and declared, in request order, without repeats.
    includes: Vec<&'p str>,
    resolvers: Includes<'p, T::Entity>,
}

impl<'p, T> Pass<'p, T>
where
    T: Transformer,
    T::Entity: Entity,
{
    fn new(transformer: &'p T, only: &'p [String], params: &'p RequestParams) -> Self {
        let mut includes: Vec<&'p str> = Vec::new();

        if let Some(requested) = params.requested_includes() {
            let declared = transformer.includes();
            if !declared.is_empty() {
                for name in requested {
                    if !declared.contains(&name) {
                        tracing::trace!(converter = %transformer.name(), include = name, "include not declared, ignoring");
                        continue;
                    }
                    if !includes.contains(&name) {
                        includes.push(name);
                    }
                }
            }
        }

        let resolvers = if includes.is_empty() {
            Includes::new()
        } else {
            transformer.resolvers()
        };

        Self {
            transformer,
            only,
            params,
            includes,
            resolvers,
        }
    }

    fn collection(&self, items: &[T::Entity]) -> Result<Value, ConvertError> {
        let Some(key) = self.params.collection_key() else {
            return items
                .iter()
                .map(|item| self.entity_to_output(item).map(Value::Object))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array);
        };

        let mut keyed = Fields::new();
        for (index, item) in items.iter().enumerate() {
            let Some(item_key) = item.attribute(key).as_ref().and_then(value::key_string) else {
                return Err(ConvertError::key_field_missing(key, index));
            };
            keyed.insert(item_key, Value::Object(self.entity_to_output(item)?));
        }
        Ok(Value::Object(keyed))
    }

    fn entity_to_output(&self, entity: &T::Entity) -> Result<Fields, ConvertError> {
        let base = self.transformer.to_fields(entity);
        let mut output = if self.only.is_empty() {
            base
        } else {
            value::retain_only(base, self.only)
        };

        let included = self.process_include(entity)?;
        if !included.is_empty() {
            value::merge(&mut output, included);
        }
        Ok(output)
    }

    fn process_include(&self, entity: &T::Entity) -> Result<Fields, ConvertError> {
        let mut included = Fields::new();
        for &name in &self.includes {
            let resolver = self
                .resolvers
                .get(name)
                .ok_or_else(|| ConvertError::resolver_not_found(name, self.transformer.name()))?;
            let nested = resolver(entity);
            included.insert(case::snake(name), nested.convert_boxed(self.params)?);
        }
        Ok(included)
    }
}
