use serde::{Deserialize, Serialize};

/// Declares a closed string enumeration with its legal value list.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn parse(text: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.as_str() == text)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum!(
    /// Place where the joke is set.
    Scenario {
        Queue => "Queue",
        Office => "Office",
        Hospital => "Hospital",
        Restaurant => "Restaurant",
        Bus => "Bus",
        Gym => "Gym",
        Library => "Library",
        Airport => "Airport",
        Supermarket => "Supermarket",
        Bar => "Bar",
    }
);

string_enum!(
    Role {
        Visitor => "Visitor",
        Waiter => "Waiter",
        Doctor => "Doctor",
        Patient => "Patient",
        Boss => "Boss",
        Employee => "Employee",
        Driver => "Driver",
        Passenger => "Passenger",
        Trainer => "Trainer",
        Librarian => "Librarian",
        Cashier => "Cashier",
        Bartender => "Bartender",
    }
);

string_enum!(
    /// Voice of the joke. Some tones carry extra prompt rules, see `tone_rules`.
    Tone {
        Dry => "Dry",
        Absurd => "Absurd",
        Dark => "Dark",
        Wholesome => "Wholesome",
        Sarcastic => "Sarcastic",
    }
);

string_enum!(
    Length {
        Short => "short",
        Medium => "medium",
        Long => "long",
    }
);

impl Default for Length {
    fn default() -> Self {
        Length::Medium
    }
}

/// A validated request. Built per call by `engine::params`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct JokeRequest {
    pub scenario: Scenario,
    pub roles: Vec<Role>,
    pub tone: Tone,
    #[serde(default)]
    pub length: Length,
}

/// Comma separated legal values, as shown to callers and to the generator.
pub fn legal_values<T: Copy + std::fmt::Display>(all: &[T]) -> String {
    all.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
