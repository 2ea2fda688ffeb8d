//! Model shared by the integration tests: a ticket held by people who may
//! own a pet.

#![allow(dead_code)]

use ooj_core::{
    ConstructionError, Deserializable, FieldTypes, FieldValue, Fields, Parameters, Serializable,
    Type,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: u32,
    pub nicknames: Vec<String>,
    pub pet: Option<Pet>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub seat: String,
    pub price: f64,
    pub persons: Vec<Person>,
}

impl Serializable for Pet {
    fn fields(&self) -> Fields<'_> {
        Fields::new().with("name", self.name.as_str())
    }
}

impl Deserializable for Pet {
    fn construct(params: &mut Parameters) -> Result<Self, ConstructionError> {
        Ok(Self {
            name: params.take("name")?,
        })
    }
}

impl Serializable for Person {
    fn fields(&self) -> Fields<'_> {
        Fields::new()
            .with("name", self.name.as_str())
            .with("age", self.age)
            .with("nicknames", FieldValue::array(self.nicknames.iter().map(String::as_str)))
            .with("pet", FieldValue::optional_object(self.pet.as_ref()))
    }
}

impl Deserializable for Person {
    fn type_hints() -> FieldTypes {
        FieldTypes::new()
            .with("nicknames", Type::sequence(Type::Any))
            .with("pet", Type::record::<Pet>())
    }

    fn construct(params: &mut Parameters) -> Result<Self, ConstructionError> {
        Ok(Self {
            name: params.take("name")?,
            age: params.take("age")?,
            nicknames: params.take_or_default("nicknames")?,
            pet: params.take_opt_object("pet")?,
        })
    }
}

impl Serializable for Ticket {
    fn fields(&self) -> Fields<'_> {
        Fields::new()
            .with("seat", self.seat.as_str())
            .with("price", self.price)
            .with("persons", FieldValue::objects(&self.persons))
    }
}

impl Deserializable for Ticket {
    fn construct(params: &mut Parameters) -> Result<Self, ConstructionError> {
        Ok(Self {
            seat: params.take("seat")?,
            price: params.take("price")?,
            persons: params.take_list_or_default("persons")?,
        })
    }
}

/// Field types a caller supplies to rebuild a [`Ticket`].
pub fn ticket_types() -> FieldTypes {
    FieldTypes::new().with("persons", Type::list_of::<Person>())
}

pub fn mike() -> Person {
    Person {
        name: "Mike".to_string(),
        age: 29,
        nicknames: vec!["mk".to_string()],
        pet: Some(Pet {
            name: "Dog".to_string(),
        }),
    }
}

pub fn kitty() -> Person {
    Person {
        name: "Kitty".to_string(),
        age: 13,
        nicknames: Vec::new(),
        pet: None,
    }
}

pub fn ticket() -> Ticket {
    Ticket {
        seat: "a18".to_string(),
        price: 12.5,
        persons: vec![mike(), kitty()],
    }
}
