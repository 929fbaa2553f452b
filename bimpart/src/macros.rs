// SPDX-License-Identifier: MIT

#[macro_export]
/// Declares the GPT partition types this crate knows about.
///
/// For each `NAME => "description", [bytes]` line the macro generates:
/// - `pub const GPT_PARTITION_TYPE_<NAME>: Guid` (on-disk byte order)
/// - `pub fn is_<name>_partition(entry: &GptEntry) -> bool`
///
/// and, once, a `GptPartitionKind` enum with an `Unknown` fallback,
/// `from_guid` / `as_guid` conversions and a `Display` impl.
///
/// Requires the `paste` crate for identifier concatenation.
macro_rules! define_partition_types {
    (
        $(
            $name:ident => $desc:expr, $guid:expr
        ),+ $(,)?
    ) => {
        paste::paste! {
            $(
                #[doc = $desc]
                pub const [<GPT_PARTITION_TYPE_ $name:upper>]: $crate::guid::Guid =
                    $crate::guid::Guid::from_disk_bytes($guid);

                #[doc = concat!("Checks if a GPT partition is of type: ", $desc)]
                pub fn [<is_ $name:lower _partition>](
                    entry: &$crate::gpt::GptEntry,
                ) -> bool {
                    entry.type_guid == [<GPT_PARTITION_TYPE_ $name:upper>]
                }
            )+

            #[allow(non_camel_case_types)]
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub enum GptPartitionKind {
                $($name,)+
                Unknown($crate::guid::Guid),
            }

            impl GptPartitionKind {
                pub fn from_guid(guid: &$crate::guid::Guid) -> Self {
                    match guid {
                        $(g if g == &[<GPT_PARTITION_TYPE_ $name:upper>] => Self::$name,)+
                        other => Self::Unknown(*other),
                    }
                }

                pub fn as_guid(&self) -> $crate::guid::Guid {
                    match self {
                        $(Self::$name => [<GPT_PARTITION_TYPE_ $name:upper>],)+
                        Self::Unknown(guid) => *guid,
                    }
                }
            }

            impl core::fmt::Display for GptPartitionKind {
                fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                    match self {
                        $(Self::$name => write!(f, $desc),)+
                        Self::Unknown(guid) => write!(f, "Unknown ({guid})"),
                    }
                }
            }
        }
    };
}
