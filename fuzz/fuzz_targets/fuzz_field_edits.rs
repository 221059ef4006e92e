#![no_main]

use std::rc::Rc;

use arbitrary::Arbitrary;
use fbind_fields::{
    Container, Field, FieldContext, IntegerDatatype, MemoryInput, TextField, ValueHolder,
    ValueSource,
};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Edit {
    Type { field: u8, text: String },
    SetValue { field: u8, value: Option<i32> },
    SourceWrite(Option<i32>),
    Bind(u8),
    Unbind(u8),
    Editable { field: Option<u8>, editable: bool },
    Validate(u8),
}

struct Form {
    container: Container,
    source: ValueHolder<i32>,
    fields: Vec<(MemoryInput<String>, TextField<i32>)>,
}

impl Form {
    fn new() -> Self {
        let cx = FieldContext::for_locale("de");
        let container = Container::new();
        let fields: Vec<_> = (0..3)
            .map(|_| {
                let input = MemoryInput::<String>::new();
                let field = Field::new(Rc::new(input.clone()), IntegerDatatype, cx.clone());
                container.add(field.clone());
                (input, field)
            })
            .collect();
        Self {
            container,
            source: ValueHolder::new(None),
            fields,
        }
    }

    fn pick(&self, index: u8) -> &(MemoryInput<String>, TextField<i32>) {
        &self.fields[usize::from(index) % self.fields.len()]
    }

    fn apply(&self, edit: Edit) {
        match edit {
            Edit::Type { field, text } => {
                let (input, _) = self.pick(field);
                input.user_input(text.chars().take(32).collect());
            }
            Edit::SetValue { field, value } => self.pick(field).1.set_value(value),
            Edit::SourceWrite(value) => {
                let _ = self.source.set_value(value);
            }
            Edit::Bind(field) => {
                let _ = self.pick(field).1.set_value_source(Some(Rc::new(self.source.clone())));
            }
            Edit::Unbind(field) => self.pick(field).1.unbind(),
            Edit::Editable { field: None, editable } => self.container.set_editable(editable),
            Edit::Editable { field: Some(i), editable } => self.pick(i).1.set_editable(editable),
            Edit::Validate(field) => {
                let _ = self.pick(field).1.validate();
            }
        }
    }

    /// Every active field shows the source value; every widget is
    /// read-only exactly when its field is not effectively editable.
    fn check(&self) {
        for (input, field) in &self.fields {
            if field.binding_state() == fbind_fields::BindingState::Active {
                assert_eq!(field.value(), self.source.value());
            }
            assert_eq!(input.is_read_only(), !field.is_editable_with_parent());
        }
    }
}

fuzz_target!(|edits: Vec<Edit>| {
    let form = Form::new();
    for edit in edits.into_iter().take(256) {
        form.apply(edit);
        form.check();
    }
});
