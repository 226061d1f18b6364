//! Scenario tests across the loader, the registry and the codec.
//!
//! The fixture document describes the `#[repr(C)]` types below with the
//! sizes and offsets the compiler picked, the way the exporter would.

use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use core::mem::offset_of;

use crate::codec::DynArray;
use crate::graph::TypeSlot;
use crate::registry::{Lifecycle, TypeRegistry};
use crate::{Module, TypeOf};

// -----------------------------------------------------------------------------
// Fixture types

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Vec2 {
    x: f32,
    y: f32,
}

#[repr(i32)]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
enum Color {
    #[default]
    Red = 0,
    Green = 1,
    Blue = 2,
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq)]
struct Config {
    text: String,
    nums: DynArray<i32>,
    fixed: [i32; 5],
    names: DynArray<String>,
    places: [String; 2],
    resolution: Vec2,
    grid: [[i32; 3]; 2],
    tolerance: f32,
    mode: Color,
    scratch: i32,
}

unsafe impl TypeOf for Config {
    const SLOT: TypeSlot = TypeSlot::new(0x1000).unwrap();
}

std::thread_local! {
    static LIVE: Rc<()> = Rc::new(());
}

/// Counts its live instances through a shared `Rc`.
#[derive(Debug, Clone)]
struct Token(#[allow(dead_code)] Rc<()>);

impl Default for Token {
    fn default() -> Self {
        Self(LIVE.with(Rc::clone))
    }
}

fn live_tokens() -> usize {
    LIVE.with(|live| Rc::strong_count(live) - 1)
}

#[repr(C)]
#[derive(Debug, Default, Clone)]
struct Pool {
    tokens: DynArray<Token>,
}

unsafe impl TypeOf for Pool {
    const SLOT: TypeSlot = TypeSlot::new(0x2000).unwrap();
}

#[cfg(feature = "auto_register")]
crate::auto_register!(Config => "Config");
#[cfg(feature = "auto_register")]
crate::auto_register!(Pool => "Pool");

// -----------------------------------------------------------------------------
// Fixture document

fn layout<T>() -> String {
    format!(
        "<Size>{}</Size><Align>{}</Align>",
        size_of::<T>(),
        align_of::<T>()
    )
}

const LIFECYCLE: &str = r#"
    <ConstructorIndex>0</ConstructorIndex>
    <DestructorIndex>1</DestructorIndex>
    <CopyConstructorIndex>2</CopyConstructorIndex>
    <AssignmentOperatorIndex>3</AssignmentOperatorIndex>
    <Functions>
      <Function><Name str="construct"/></Function>
      <Function><Name str="destruct"/></Function>
      <Function><Name str="copy"/></Function>
      <Function><Name str="assign"/></Function>
    </Functions>"#;

fn field(name: &str, ty: &str, offset: usize, extra: &str) -> String {
    format!(
        r#"<Field><Name str="{name}"/><Type str="{ty}"/><Offset>{offset}</Offset>{extra}</Field>"#
    )
}

fn array(dim0: usize, dim1: usize) -> String {
    let rank = if dim1 > 1 { 2 } else { 1 };
    format!(
        "<ArrayRank>{rank}</ArrayRank><ArrayLength0>{dim0}</ArrayLength0><ArrayLength1>{dim1}</ArrayLength1>"
    )
}

fn instance(name: &str, arg: &str, layout: &str) -> String {
    format!(
        r#"<TemplateInstance>
             <Name str="{name}"/><FullName str="{name}"/>{layout}{LIFECYCLE}
             <InstanceOf str="DynArray"/><Type0 str="{arg}"/>
           </TemplateInstance>"#
    )
}

fn document() -> String {
    let config_fields = [
        field("text", "String", offset_of!(Config, text), ""),
        field("nums", "DynArray&lt;int&gt;", offset_of!(Config, nums), ""),
        field("fixed", "int", offset_of!(Config, fixed), &array(5, 1)),
        field("names", "DynArray&lt;String&gt;", offset_of!(Config, names), ""),
        field("places", "String", offset_of!(Config, places), &array(2, 1)),
        field("resolution", "Vec2", offset_of!(Config, resolution), ""),
        field("grid", "int", offset_of!(Config, grid), &array(2, 3)),
        field("tolerance", "float", offset_of!(Config, tolerance), ""),
        field("mode", "Color", offset_of!(Config, mode), ""),
        field(
            "scratch",
            "int",
            offset_of!(Config, scratch),
            r#"<Attributes><Attribute><Name str="transient"/></Attribute></Attributes>"#,
        ),
    ]
    .concat();

    format!(
        r#"
<RflDb>
  <Namespace>
    <Name str="">0</Name><FullName str="">0</FullName>
    <BaseTypes>
      <BaseType><Name str="int"/><FullName str="int"/>{int}</BaseType>
      <BaseType><Name str="float"/><FullName str="float"/>{float}</BaseType>
    </BaseTypes>
    <Classes>
      <Class><Name str="String"/><FullName str="String"/>{string}{LIFECYCLE}</Class>
      <Class>
        <Name str="Vec2"/><FullName str="Vec2"/>{vec2}<IsPOD>true</IsPOD>
        <Fields>
          {vec2_x}{vec2_y}
        </Fields>
      </Class>
      <Class>
        <Name str="Config"/><FullName str="Config"/>{config}<TypeOfVA>4096</TypeOfVA>{LIFECYCLE}
        <Fields>{config_fields}</Fields>
      </Class>
      <Class><Name str="Token"/><FullName str="Token"/>{token}{LIFECYCLE}</Class>
      <Class>
        <Name str="Pool"/><FullName str="Pool"/>{pool}<TypeOfVA>8192</TypeOfVA>{LIFECYCLE}
        <Fields>{pool_tokens}</Fields>
      </Class>
    </Classes>
    <Templates>
      <Template><Name str="DynArray"/><FullName str="DynArray"/></Template>
    </Templates>
    <TemplateInstances>
      {dyn_int}{dyn_string}{dyn_token}
    </TemplateInstances>
    <Enums>
      <Enum>
        <Name str="Color"/><FullName str="Color"/>{color}
        <Entries>
          <Entry><Name str="Red"/><Value>0</Value></Entry>
          <Entry><Name str="Green"/><Value>1</Value></Entry>
          <Entry><Name str="Blue"/><Value>2</Value></Entry>
        </Entries>
      </Enum>
    </Enums>
  </Namespace>
</RflDb>"#,
        int = layout::<i32>(),
        float = layout::<f32>(),
        string = layout::<String>(),
        vec2 = layout::<Vec2>(),
        vec2_x = field("x", "float", offset_of!(Vec2, x), ""),
        vec2_y = field("y", "float", offset_of!(Vec2, y), ""),
        config = layout::<Config>(),
        token = layout::<Token>(),
        pool = layout::<Pool>(),
        pool_tokens = field("tokens", "DynArray&lt;Token&gt;", offset_of!(Pool, tokens), ""),
        dyn_int = instance("DynArray&lt;int&gt;", "int", &layout::<DynArray<i32>>()),
        dyn_string = instance("DynArray&lt;String&gt;", "String", &layout::<DynArray<String>>()),
        dyn_token = instance("DynArray&lt;Token&gt;", "Token", &layout::<DynArray<Token>>()),
        color = layout::<Color>(),
    )
}

fn module() -> Module {
    Module::from_xml(&document()).unwrap()
}

/// Built-in hooks installed, no lifecycle bound.
fn bare_registry() -> TypeRegistry {
    TypeRegistry::with_builtin_hooks(module())
}

fn registry() -> TypeRegistry {
    let mut registry = bare_registry();
    let lifecycles = [
        ("String", Lifecycle::of::<String>()),
        ("Config", Lifecycle::of::<Config>()),
        ("Token", Lifecycle::of::<Token>()),
        ("Pool", Lifecycle::of::<Pool>()),
        ("DynArray<int>", Lifecycle::of::<DynArray<i32>>()),
        ("DynArray<String>", Lifecycle::of::<DynArray<String>>()),
        ("DynArray<Token>", Lifecycle::of::<DynArray<Token>>()),
    ];
    for (name, lifecycle) in lifecycles {
        assert_eq!(registry.register_lifecycle_by_name(name, lifecycle), Ok(4));
    }
    registry
}

/// Writes the expected stream by hand.
#[derive(Default)]
struct Wire(alloc::vec::Vec<u8>);

impl Wire {
    fn len(mut self, len: u32) -> Self {
        self.0.extend_from_slice(&len.to_ne_bytes());
        self
    }

    fn int(mut self, value: i32) -> Self {
        self.0.extend_from_slice(&value.to_ne_bytes());
        self
    }

    fn float(mut self, value: f32) -> Self {
        self.0.extend_from_slice(&value.to_ne_bytes());
        self
    }

    fn text(self, text: &str) -> Self {
        let mut wire = self.len(text.len() as u32);
        wire.0.extend_from_slice(text.as_bytes());
        wire
    }
}

fn sample() -> Config {
    Config {
        text: String::from("hello"),
        nums: DynArray::from([3, 4]),
        fixed: [3, 8, 17, 25, 42],
        names: DynArray::from([String::from("ab")]),
        places: [String::from("x"), String::from("yz")],
        resolution: Vec2 { x: 1.5, y: -2.0 },
        grid: [[1, 2, 3], [4, 5, 6]],
        tolerance: 0.25,
        mode: Color::Blue,
        scratch: 99,
    }
}

// -----------------------------------------------------------------------------
// Tests

mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::mem::offset_of;
    use std::io::ErrorKind;

    use rfl_ptr::{Ptr, PtrMut};

    use super::{
        Color, Config, DynArray, Pool, Token, Wire, bare_registry, live_tokens, registry, sample,
    };
    use crate::codec::{CodecError, Deserializer, Serializer, UnsupportedPolicy};
    use crate::registry::{Capabilities, LifecycleError, Role, TypeRegistry};
    use crate::Module;

    #[test]
    fn fixture_loads_clean() {
        let registry = registry();
        let module = registry.module();
        assert!(module.report().is_clean(), "{:?}", module.report());
        assert_eq!(module.type_of::<Config>(), module.find_type("Config"));
        assert_eq!(module.type_of::<Pool>(), module.find_type("Pool"));

        let config = module.find_type("Config").unwrap();
        assert_eq!(registry.capabilities(config), Capabilities::all());

        let color = module.find_type("Color").unwrap();
        let entry = module.ty(color).as_enum().unwrap().entry_for(Color::Green as i32);
        assert_eq!(entry.map(|entry| entry.name.text()), Some("Green"));
    }

    #[test]
    fn round_trip_into_default_object() {
        let registry = registry();
        let config = registry.module().find_type("Config").unwrap();
        let source = sample();

        let bytes = Serializer::new(&registry).to_bytes_typed(&source).unwrap();

        let mut target = registry.create_object(config).unwrap();
        unsafe {
            Deserializer::new(&registry)
                .from_bytes(config, target.as_mut(), &bytes)
                .unwrap();
        }
        let back = unsafe { target.downcast_ref::<Config>() };
        assert_eq!(back.text, "hello");
        assert_eq!(back.nums.as_slice(), &[3, 4]);
        assert_eq!(back.fixed, [3, 8, 17, 25, 42]);
        assert_eq!(back.names.as_slice(), &[String::from("ab")]);
        assert_eq!(back.places, [String::from("x"), String::from("yz")]);
        assert_eq!(back.grid, [[1, 2, 3], [4, 5, 6]]);
        assert_eq!(back.mode, Color::Blue);
        // Transient.
        assert_eq!(back.scratch, 0);

        let mut expected = source.clone();
        expected.scratch = 0;
        assert_eq!(*back, expected);
    }

    #[test]
    fn wire_layout() {
        let registry = registry();
        let bytes = Serializer::new(&registry).to_bytes_typed(&sample()).unwrap();

        let expected = Wire::default()
            .text("hello")
            .len(2)
            .int(3)
            .int(4)
            .int(3)
            .int(8)
            .int(17)
            .int(25)
            .int(42)
            .len(1)
            .text("ab")
            .text("x")
            .text("yz")
            .float(1.5)
            .float(-2.0)
            .int(1)
            .int(2)
            .int(3)
            .int(4)
            .int(5)
            .int(6)
            .float(0.25)
            .int(Color::Blue as i32);
        assert_eq!(bytes, expected.0);
    }

    #[test]
    fn arrays_shrink_and_grow_in_place() {
        let registry = registry();
        let source = sample();
        let bytes = Serializer::new(&registry).to_bytes_typed(&source).unwrap();

        let mut target = Config {
            text: String::from("a much longer previous text"),
            nums: (0..100).collect(),
            names: ["p", "q", "r"].into_iter().map(String::from).collect(),
            scratch: 7,
            ..Config::default()
        };
        Deserializer::new(&registry)
            .from_bytes_typed(&mut target, &bytes)
            .unwrap();
        assert_eq!(target.text, "hello");
        assert_eq!(target.nums.as_slice(), &[3, 4]);
        assert_eq!(target.nums.capacity(), 2);
        assert_eq!(target.names.len(), 1);
        assert_eq!(target.scratch, 7);

        let empty = Config::default();
        let bytes = Serializer::new(&registry).to_bytes_typed(&empty).unwrap();
        Deserializer::new(&registry)
            .from_bytes_typed(&mut target, &bytes)
            .unwrap();
        assert!(target.nums.is_empty());
        assert!(target.names.is_empty());
        assert!(target.text.is_empty());
    }

    #[test]
    fn dyn_array_resize_leaks_nothing() {
        let registry = registry();
        assert_eq!(live_tokens(), 0);

        let source = Pool {
            tokens: (0..2).map(|_| Token::default()).collect(),
        };
        let mut target = Pool {
            tokens: (0..5).map(|_| Token::default()).collect(),
        };
        assert_eq!(live_tokens(), 7);

        let bytes = Serializer::new(&registry).to_bytes_typed(&source).unwrap();
        assert_eq!(bytes, 2_u32.to_ne_bytes());
        Deserializer::new(&registry)
            .from_bytes_typed(&mut target, &bytes)
            .unwrap();
        assert_eq!(target.tokens.len(), 2);
        assert_eq!(live_tokens(), 4);

        let grown = Pool {
            tokens: (0..6).map(|_| Token::default()).collect(),
        };
        let bytes = Serializer::new(&registry).to_bytes_typed(&grown).unwrap();
        Deserializer::new(&registry)
            .from_bytes_typed(&mut target, &bytes)
            .unwrap();
        assert_eq!(target.tokens.len(), 6);
        assert_eq!(live_tokens(), 14);

        drop((source, target, grown));
        assert_eq!(live_tokens(), 0);
    }

    #[test]
    fn bulk_and_per_element_arrays() {
        let registry = registry();
        let module = registry.module();
        let int = module.find_type("int").unwrap();
        let string = module.find_type("String").unwrap();
        let ser = Serializer::new(&registry);

        let fixed = [3_i32, 8, 17, 25, 42];
        let mut bulk = Vec::new();
        unsafe { ser.write_elements(int, Ptr::from_ref(&fixed), 5, &mut bulk) }.unwrap();
        let memory = unsafe { Ptr::from_ref(&fixed).as_bytes(size_of_val(&fixed)) };
        assert_eq!(bulk, memory);

        let places = [String::from("x"), String::from("yz")];
        let mut each = Vec::new();
        unsafe { ser.write_elements(string, Ptr::from_ref(&places), 2, &mut each) }.unwrap();
        let mut joined = Vec::new();
        for place in &places {
            joined.extend(unsafe { ser.to_bytes(string, Ptr::from_ref(place)) }.unwrap());
        }
        assert_eq!(each, joined);
    }

    #[test]
    fn truncated_stream() {
        let registry = registry();
        let bytes = Serializer::new(&registry).to_bytes_typed(&sample()).unwrap();

        let mut target = Config::default();
        let err = Deserializer::new(&registry)
            .from_bytes_typed(&mut target, &bytes[..bytes.len() - 2])
            .unwrap_err();
        assert!(matches!(err, CodecError::Io(e) if e.kind() == ErrorKind::UnexpectedEof));
        // Everything before the cut was read.
        assert_eq!(target.text, "hello");
    }

    #[test]
    fn invalid_text_empties_the_target() {
        let registry = registry();
        let string = registry.module().find_type("String").unwrap();
        let bytes = Wire::default().len(2).0.into_iter().chain([0xC3, 0x28]).collect::<Vec<_>>();

        let mut text = String::from("previous");
        let err = unsafe {
            Deserializer::new(&registry).from_bytes(string, PtrMut::from_mut(&mut text), &bytes)
        }
        .unwrap_err();
        assert!(matches!(err, CodecError::InvalidText { ty } if ty == "String"));
        assert!(text.is_empty());
    }

    #[test]
    fn unbound_element_constructor() {
        let registry = bare_registry();
        let bytes = Serializer::new(&registry).to_bytes_typed(&sample()).unwrap();

        let mut target = Config::default();
        let err = Deserializer::new(&registry)
            .from_bytes_typed(&mut target, &bytes)
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::Lifecycle(LifecycleError::Unbound { ref ty, role: Role::Construct })
                if ty == "String"
        ));

        let config = registry.module().find_type("Config").unwrap();
        assert!(matches!(
            registry.create_object(config),
            Err(LifecycleError::Unbound { .. })
        ));
    }

    #[test]
    fn typed_entry_points_need_a_slot() {
        struct Stranger;

        unsafe impl crate::TypeOf for Stranger {
            const SLOT: crate::graph::TypeSlot = crate::graph::TypeSlot::new(0x3000).unwrap();
        }

        let registry = registry();
        let err = Serializer::new(&registry)
            .to_bytes_typed(&Stranger)
            .unwrap_err();
        assert!(matches!(err, CodecError::UnboundType(_)));
    }

    const DEGRADED: &str = r#"
        <RflDb><Namespace>
          <BaseTypes>
            <BaseType><Name str="int"/><FullName str="int"/><Size>4</Size></BaseType>
          </BaseTypes>
          <Classes>
            <Class>
              <Name str="Node"/><FullName str="Node"/><Size>24</Size><Align>8</Align>
              <Fields>
                <Field><Name str="next"/><Type str="Node"/><Modifier>pointer</Modifier><Offset>0</Offset></Field>
                <Field><Name str="lost"/><Type str="Gone"/><Offset>8</Offset></Field>
                <Field><Name str="value"/><Type str="int"/><Offset>12</Offset></Field>
                <Field><Name str="table"/><Type str="Map&lt;int&gt;"/><Offset>16</Offset></Field>
              </Fields>
            </Class>
          </Classes>
          <Templates>
            <Template><Name str="Map"/><FullName str="Map"/></Template>
          </Templates>
          <TemplateInstances>
            <TemplateInstance>
              <Name str="Map&lt;int&gt;"/><FullName str="Map&lt;int&gt;"/><Size>8</Size>
              <InstanceOf str="Map"/><Type0 str="int"/>
            </TemplateInstance>
          </TemplateInstances>
        </Namespace></RflDb>"#;

    #[repr(C)]
    struct Node {
        next: usize,
        lost: i32,
        value: i32,
        table: u64,
    }

    #[test]
    fn unknown_reference_degrades_one_field() {
        let module = Module::from_xml(DEGRADED).unwrap();
        assert_eq!(module.report().unresolved.len(), 1);

        let node = module.find_type("Node").unwrap();
        let class = module.ty(node).as_class().unwrap();
        assert!(class.field("lost").unwrap().ty.is_absent());
        assert_eq!(class.field("value").unwrap().ty.handle(), module.find_type("int"));
        assert_eq!(class.field("next").unwrap().ty.handle(), Some(node));

        let registry = TypeRegistry::new(module);
        assert!(!registry.capabilities(node).contains(Capabilities::SERIALIZE));
    }

    #[test]
    fn unsupported_policy() {
        let registry = TypeRegistry::new(Module::from_xml(DEGRADED).unwrap());
        let node = registry.module().find_type("Node").unwrap();
        let value = Node {
            next: 0,
            lost: -1,
            value: 77,
            table: 5,
        };

        let err = unsafe { Serializer::new(&registry).to_bytes(node, Ptr::from_ref(&value)) }
            .unwrap_err();
        assert!(matches!(err, CodecError::Unsupported { ref ty, .. } if ty == "Node"));

        let ser = Serializer::new(&registry).with_policy(UnsupportedPolicy::Skip);
        let bytes = unsafe { ser.to_bytes(node, Ptr::from_ref(&value)) }.unwrap();
        assert_eq!(bytes, 77_i32.to_ne_bytes());

        let mut back = Node {
            next: 1,
            lost: 2,
            value: 3,
            table: 4,
        };
        let de = Deserializer::new(&registry).with_policy(UnsupportedPolicy::Skip);
        unsafe { de.from_bytes(node, PtrMut::from_mut(&mut back), &bytes) }.unwrap();
        assert_eq!((back.next, back.lost, back.value, back.table), (1, 2, 77, 4));
    }

    #[repr(C)]
    struct Packet {
        len: u32,
        data: [u8; 0],
    }

    #[test]
    fn zero_length_array_round_trip() {
        let xml = format!(
            r#"<RflDb><Namespace>
              <BaseTypes>
                <BaseType><Name str="u32"/><FullName str="u32"/><Size>4</Size></BaseType>
                <BaseType><Name str="char"/><FullName str="char"/><Size>1</Size></BaseType>
              </BaseTypes>
              <Classes><Class>
                <Name str="Packet"/><FullName str="Packet"/><Size>{size}</Size><Align>4</Align>
                <Fields>
                  <Field><Name str="len"/><Type str="u32"/><Offset>{len}</Offset></Field>
                  <Field>
                    <Name str="data"/><Type str="char"/><Offset>{data}</Offset>
                    <ArrayRank>1</ArrayRank><ArrayLength0>0</ArrayLength0>
                  </Field>
                </Fields>
              </Class></Classes>
            </Namespace></RflDb>"#,
            size = size_of::<Packet>(),
            len = offset_of!(Packet, len),
            data = offset_of!(Packet, data),
        );
        let registry = TypeRegistry::new(Module::from_xml(&xml).unwrap());
        let packet = registry.module().find_type("Packet").unwrap();
        assert!(registry.capabilities(packet).contains(Capabilities::SERIALIZE));

        let value = Packet { len: 9, data: [] };
        let ser = Serializer::new(&registry);
        let bytes = unsafe { ser.to_bytes(packet, Ptr::from_ref(&value)) }.unwrap();
        assert_eq!(bytes, 9_u32.to_ne_bytes());

        let mut back = Packet { len: 0, data: [] };
        let de = Deserializer::new(&registry);
        unsafe { de.from_bytes(packet, PtrMut::from_mut(&mut back), &bytes) }.unwrap();
        assert_eq!(back.len, 9);
        assert!(back.data.is_empty());
    }

    #[cfg(feature = "auto_register")]
    #[test]
    fn auto_registered_lifecycles() {
        let mut registry = bare_registry();
        let config = registry.module().find_type("Config").unwrap();
        assert!(!registry.capabilities(config).contains(Capabilities::CONSTRUCT));

        assert_eq!(registry.auto_register(), 2);
        assert!(registry.constructor(config).unwrap().is_some());
        let object = registry.create_object(config).unwrap();
        assert_eq!(unsafe { object.downcast_ref::<Config>() }, &Config::default());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn graph_dump() {
        let registry = registry();
        let dump = serde_json::to_value(registry.module()).unwrap();

        let types = dump["types"].as_array().unwrap();
        let config = types
            .iter()
            .find(|ty| ty["scope"]["full_name"]["text"] == "Config")
            .unwrap();
        assert_eq!(config["layout"]["size"], size_of::<Config>());
        assert_eq!(config["kind"]["Class"]["fields"].as_array().unwrap().len(), 10);
        assert_eq!(config["slot"], 0x1000);
        assert_eq!(dump["report"]["rebound_slots"], 0);
    }

    #[test]
    fn concurrent_codec_calls() {
        use std::sync::Arc;

        let registry = Arc::new(registry());
        let handles: Vec<_> = (0..4)
            .map(|index| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    let mut nums = DynArray::new();
                    nums.push(index);
                    let value = Config {
                        nums,
                        ..Config::default()
                    };
                    let bytes = Serializer::new(&registry).to_bytes_typed(&value).unwrap();
                    let mut back = Config::default();
                    Deserializer::new(&registry)
                        .from_bytes_typed(&mut back, &bytes)
                        .unwrap();
                    back.nums.as_slice() == [index]
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
