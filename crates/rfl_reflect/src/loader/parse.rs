use alloc::string::ToString;
use alloc::vec::Vec;
use core::alloc::Layout;

use roxmltree::{Document, Node};

use super::document::{self, boolean, child, entries, integer, name};
use crate::graph::{
    ArrayDesc, Attribute, AttributeValue, CallTarget, ClassInfo, EnumEntry, EnumInfo, Field,
    Function, FunctionHandle, FunctionRef, InstanceInfo, Modifier, Namespace, NamespaceHandle,
    Parameter, Scope, ScopeOwner, Type, TypeHandle, TypeKind, TypeRef, TypeSlot,
};
use crate::Module;
use crate::loader::LoadError;

/// Largest alignment assumed for types whose document gives none.
const MAX_IMPLIED_ALIGN: u64 = 16;

/// First phase: walk the document into the module arenas.
///
/// Type references are left as [`TypeRef::Unresolved`] and lifecycle
/// functions as [`FunctionRef::Ordinal`].
pub(super) fn parse(doc: &Document<'_>, module: &mut Module) -> Result<(), LoadError> {
    let root = doc.root_element();
    if !root.has_tag_name("RflDb") {
        return Err(LoadError::MissingRoot);
    }
    let global = child(root, "Namespace").ok_or(LoadError::MissingRoot)?;

    Parser { module }.namespace(global, None)?;
    Ok(())
}

struct Parser<'m> {
    module: &'m mut Module,
}

impl Parser<'_> {
    fn namespace(
        &mut self,
        node: Node<'_, '_>,
        parent: Option<ScopeOwner>,
    ) -> Result<NamespaceHandle, LoadError> {
        let handle = NamespaceHandle::new(checked_len(self.module.namespaces.len())?);
        self.module.namespaces.push(Namespace::default());

        let scope = self.scope(node, parent, ScopeOwner::Namespace(handle))?;
        self.module.namespaces[handle.index()].scope = scope;
        Ok(handle)
    }

    /// Reads the names of a scope and every child collection.
    fn scope(
        &mut self,
        node: Node<'_, '_>,
        parent: Option<ScopeOwner>,
        owner: ScopeOwner,
    ) -> Result<Scope, LoadError> {
        let mut scope = Scope::new(name(node, "Name")?, name(node, "FullName")?, parent);
        let within = Some(owner);

        for entry in entries(node, "Namespaces", "Namespace") {
            scope.namespaces.push(self.namespace(entry, within)?);
        }
        for entry in entries(node, "BaseTypes", "BaseType") {
            scope.primitives.push(self.ty(entry, within, TypeKind::Primitive)?);
        }
        for entry in entries(node, "Classes", "Class") {
            let kind = TypeKind::Class(class(entry)?);
            scope.classes.push(self.ty(entry, within, kind)?);
        }
        for entry in entries(node, "Templates", "Template") {
            scope.templates.push(self.ty(entry, within, TypeKind::Template)?);
        }
        for entry in entries(node, "TemplateInstances", "TemplateInstance") {
            let kind = TypeKind::TemplateInstance(InstanceInfo {
                instance_of: type_ref(entry, "InstanceOf")?,
                args: [type_ref(entry, "Type0")?, type_ref(entry, "Type1")?],
            });
            scope.template_instances.push(self.ty(entry, within, kind)?);
        }
        for entry in entries(node, "Enums", "Enum") {
            let kind = TypeKind::Enum(enumeration(entry)?);
            scope.enums.push(self.ty(entry, within, kind)?);
        }
        for entry in entries(node, "Functions", "Function") {
            scope.functions.push(self.function(entry, owner)?);
        }
        Ok(scope)
    }

    /// Pushes a type, then parses its nested scope so handles stay in
    /// document pre-order.
    fn ty(
        &mut self,
        node: Node<'_, '_>,
        parent: Option<ScopeOwner>,
        kind: TypeKind,
    ) -> Result<TypeHandle, LoadError> {
        let handle = TypeHandle::new(checked_len(self.module.types.len())?);
        let slot = integer::<u64>(node, "TypeOfVA")?.and_then(TypeSlot::new);

        self.module.types.push(Type {
            scope: Scope::default(),
            unique_id: integer::<i64>(node, "UniqueID")?.unwrap_or(0) as u32,
            layout: layout(node)?,
            slot,
            constructor: function_ref(node, "ConstructorIndex")?,
            destructor: function_ref(node, "DestructorIndex")?,
            copy_constructor: function_ref(node, "CopyConstructorIndex")?,
            assignment: function_ref(node, "AssignmentOperatorIndex")?,
            kind,
        });

        let scope = self.scope(node, parent, ScopeOwner::Type(handle))?;
        self.module.types[handle.index()].scope = scope;
        Ok(handle)
    }

    fn function(
        &mut self,
        node: Node<'_, '_>,
        owner: ScopeOwner,
    ) -> Result<FunctionHandle, LoadError> {
        let handle = FunctionHandle::new(checked_len(self.module.functions.len())?);
        let return_param = match child(node, "ReturnParameter") {
            Some(element) => Some(parameter(element)?),
            None => None,
        };
        let params = entries(node, "Parameters", "Parameter")
            .map(parameter)
            .collect::<Result<Vec<_>, _>>()?;

        self.module.functions.push(Function {
            name: name(node, "Name")?,
            owner,
            call_target: CallTarget(integer::<u64>(node, "CallAddress")?.unwrap_or(0)),
            return_param,
            params,
        });
        Ok(handle)
    }
}

// -----------------------------------------------------------------------------
// Records

fn checked_len(len: usize) -> Result<usize, LoadError> {
    if len >= u32::MAX as usize {
        Err(LoadError::TooManyRecords)
    } else {
        Ok(len)
    }
}

fn type_ref(node: Node<'_, '_>, tag: &'static str) -> Result<TypeRef, LoadError> {
    Ok(TypeRef::placeholder(name(node, tag)?.hash()))
}

fn function_ref(node: Node<'_, '_>, tag: &'static str) -> Result<FunctionRef, LoadError> {
    Ok(match integer::<i64>(node, tag)? {
        Some(ordinal) => FunctionRef::from_ordinal(ordinal),
        None => FunctionRef::Absent,
    })
}

/// `Size` and `Align`; without `Align` the largest power of two dividing the
/// size is used, capped at 16.
fn layout(node: Node<'_, '_>) -> Result<Layout, LoadError> {
    let size = integer::<u64>(node, "Size")?.unwrap_or(0);
    let align = match integer::<u64>(node, "Align")? {
        Some(align) => align,
        None if size == 0 => 1,
        None => (1_u64 << size.trailing_zeros()).min(MAX_IMPLIED_ALIGN),
    };

    let invalid = || LoadError::InvalidLayout {
        name: child(node, "FullName")
            .and_then(|element| element.attribute("str"))
            .unwrap_or_default()
            .to_string(),
        size,
        align,
    };
    let size_usize = usize::try_from(size).map_err(|_| invalid())?;
    let align_usize = usize::try_from(align).map_err(|_| invalid())?;
    Layout::from_size_align(size_usize, align_usize).map_err(|_| invalid())
}

fn parameter(node: Node<'_, '_>) -> Result<Parameter, LoadError> {
    let modifier = match document::text(node, "Modifier") {
        None | Some("") => Modifier::Value,
        Some(text) => Modifier::parse(text).ok_or_else(|| LoadError::InvalidValue {
            element: "Modifier",
            text: text.to_string(),
            pos: document::pos(node),
        })?,
    };

    let rank = integer::<i64>(node, "ArrayRank")?.unwrap_or(0);
    let dim0 = integer::<i64>(node, "ArrayLength0")?.unwrap_or(1);
    let dim1 = integer::<i64>(node, "ArrayLength1")?.unwrap_or(1);
    let array = ArrayDesc::new(rank, dim0, dim1).map_err(|source| LoadError::InvalidArray {
        pos: document::pos(node),
        source,
    })?;

    Ok(Parameter {
        name: name(node, "Name")?,
        ty: type_ref(node, "Type")?,
        is_const: boolean(node, "IsConst"),
        modifier,
        array,
    })
}

fn class(node: Node<'_, '_>) -> Result<ClassInfo, LoadError> {
    let fields = entries(node, "Fields", "Field")
        .map(field)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ClassInfo {
        is_pod: boolean(node, "IsPOD"),
        fields,
        attributes: attributes(node)?,
    })
}

fn field(node: Node<'_, '_>) -> Result<Field, LoadError> {
    let offset = integer::<u32>(node, "Offset")?.unwrap_or(0);
    let mut field = Field::new(parameter(node)?, offset);
    field.attributes = attributes(node)?;
    Ok(field)
}

fn enumeration(node: Node<'_, '_>) -> Result<EnumInfo, LoadError> {
    let entries = entries(node, "Entries", "Entry")
        .map(|entry| {
            Ok(EnumEntry {
                name: name(entry, "Name")?,
                // Values are stored in a 32-bit slot; wider exports wrap.
                value: integer::<i64>(entry, "Value")?.unwrap_or(0) as i32,
            })
        })
        .collect::<Result<Vec<_>, LoadError>>()?;
    Ok(EnumInfo { entries })
}

fn attributes(node: Node<'_, '_>) -> Result<Vec<Attribute>, LoadError> {
    entries(node, "Attributes", "Attribute")
        .map(attribute)
        .collect()
}

fn attribute(node: Node<'_, '_>) -> Result<Attribute, LoadError> {
    let invalid = |element: &'static str, text: &str| LoadError::InvalidValue {
        element,
        text: text.to_string(),
        pos: document::pos(node),
    };

    let kind = document::text(node, "ValueType").unwrap_or("Boolean");
    let raw = document::text(node, "Value");
    let value = match kind {
        // A flag without a value is set.
        "Boolean" => AttributeValue::Bool(raw.is_none_or(|text| text.eq_ignore_ascii_case("true"))),
        "Integer" => {
            let text = raw.unwrap_or("");
            AttributeValue::Int(text.parse().map_err(|_| LoadError::InvalidInteger {
                element: "Value",
                text: text.to_string(),
                pos: document::pos(node),
            })?)
        }
        "Float" => {
            let text = raw.unwrap_or("");
            AttributeValue::Float(text.parse().map_err(|_| invalid("Value", text))?)
        }
        "Symbol" => AttributeValue::Symbol(raw.unwrap_or("").into()),
        "String" => AttributeValue::String(raw.unwrap_or("").into()),
        other => return Err(invalid("ValueType", other)),
    };
    Ok(Attribute::new(name(node, "Name")?, value))
}

#[cfg(test)]
mod tests {
    use roxmltree::Document;

    use super::parse;
    use crate::graph::{AttributeValue, FunctionRef, Modifier, ScopeOwner, TypeKind, TypeRef};
    use crate::loader::LoadError;
    use crate::{Module, NameHash};

    fn parse_str(xml: &str) -> Result<Module, LoadError> {
        let doc = Document::parse(xml)?;
        let mut module = Module::default();
        parse(&doc, &mut module)?;
        Ok(module)
    }

    #[test]
    fn types_are_pre_order() {
        let module = parse_str(
            r#"<RflDb><Namespace>
                <Classes>
                  <Class>
                    <Name str="Outer"/><FullName str="Outer"/><Size>4</Size>
                    <Classes>
                      <Class><Name str="Inner"/><FullName str="Outer::Inner"/><Size>2</Size></Class>
                    </Classes>
                  </Class>
                  <Class><Name str="Next"/><FullName str="Next"/><Size>1</Size></Class>
                </Classes>
            </Namespace></RflDb>"#,
        )
        .unwrap();

        let names: alloc::vec::Vec<_> = module.types().map(|(_, ty)| ty.name().text()).collect();
        assert_eq!(names, ["Outer", "Inner", "Next"]);

        let (outer, _) = module.types().next().unwrap();
        let (_, inner) = module.types().nth(1).unwrap();
        assert_eq!(inner.scope.parent, Some(ScopeOwner::Type(outer)));
        assert_eq!(inner.align(), 2);
    }

    #[test]
    fn references_wait_for_patching() {
        let module = parse_str(
            r#"<RflDb><Namespace>
                <Classes>
                  <Class>
                    <Name str="Holder"/><FullName str="Holder"/><Size>16</Size>
                    <ConstructorIndex>0</ConstructorIndex>
                    <DestructorIndex>-1</DestructorIndex>
                    <Fields>
                      <Field>
                        <Name str="next"/><Type str="Holder"/><Modifier>Pointer</Modifier>
                        <Offset>8</Offset>
                      </Field>
                      <Field><Name str="none"/><Type str="">0</Type></Field>
                    </Fields>
                    <Attributes>
                      <Attribute><Name str="editable"/></Attribute>
                      <Attribute>
                        <Name str="group"/><ValueType>Symbol</ValueType><Value>Render</Value>
                      </Attribute>
                      <Attribute>
                        <Name str="weight"/><ValueType>Float</ValueType><Value>0.5</Value>
                      </Attribute>
                    </Attributes>
                  </Class>
                </Classes>
            </Namespace></RflDb>"#,
        )
        .unwrap();

        let (_, holder) = module.types().next().unwrap();
        assert_eq!(holder.constructor, FunctionRef::Ordinal(0));
        assert_eq!(holder.destructor, FunctionRef::Absent);
        assert_eq!(holder.copy_constructor, FunctionRef::Absent);

        let TypeKind::Class(class) = &holder.kind else {
            panic!("Holder is a class");
        };
        assert_eq!(class.fields[0].ty, TypeRef::Unresolved(NameHash::of("Holder")));
        assert_eq!(class.fields[0].modifier, Modifier::Pointer);
        assert_eq!(class.fields[0].offset, 8);
        assert_eq!(class.fields[1].ty, TypeRef::Absent);

        assert_eq!(class.attributes[0].value, AttributeValue::Bool(true));
        assert_eq!(class.attributes[1].value, AttributeValue::Symbol("Render".into()));
        assert_eq!(class.attributes[2].value, AttributeValue::Float(0.5));
    }

    #[test]
    fn malformed_records_fail() {
        let bad_rank = r#"<RflDb><Namespace><Classes><Class>
            <Name str="A"/><Size>4</Size>
            <Fields><Field><Name str="x"/><ArrayRank>3</ArrayRank></Field></Fields>
        </Class></Classes></Namespace></RflDb>"#;
        assert!(matches!(parse_str(bad_rank), Err(LoadError::InvalidArray { .. })));

        let bad_size = r#"<RflDb><Namespace><BaseTypes><BaseType>
            <Name str="A"/><Size>four</Size>
        </BaseType></BaseTypes></Namespace></RflDb>"#;
        assert!(matches!(
            parse_str(bad_size),
            Err(LoadError::InvalidInteger { element: "Size", .. })
        ));

        let bad_align = r#"<RflDb><Namespace><BaseTypes><BaseType>
            <Name str="A"/><FullName str="A"/><Size>4</Size><Align>3</Align>
        </BaseType></BaseTypes></Namespace></RflDb>"#;
        match parse_str(bad_align) {
            Err(LoadError::InvalidLayout { name, align: 3, .. }) => assert_eq!(name, "A"),
            other => panic!("unexpected {other:?}"),
        }

        let bad_modifier = r#"<RflDb><Namespace><Classes><Class>
            <Name str="A"/><Size>4</Size>
            <Fields><Field><Name str="x"/><Modifier>handle</Modifier></Field></Fields>
        </Class></Classes></Namespace></RflDb>"#;
        assert!(matches!(
            parse_str(bad_modifier),
            Err(LoadError::InvalidValue { element: "Modifier", .. })
        ));

        assert!(matches!(parse_str("<Other/>"), Err(LoadError::MissingRoot)));
        assert!(matches!(parse_str("<RflDb/>"), Err(LoadError::MissingRoot)));
        assert!(matches!(parse_str("<RflDb>"), Err(LoadError::Xml(_))));
    }
}
