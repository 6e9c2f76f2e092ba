pub const DEFAULT_AREA: &str = "天津工业大学";
pub const DEFAULT_ACCOUNT: &str = "26577";

/// Identifiers the billing endpoint needs to locate one room's meter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDescriptor {
    pub name: String,
    pub building_id: String,
    pub building: String,
    pub floor_id: String,
    pub floor: String,
    pub room_id: String,
    pub room: String,
    pub area: String,
    pub area_name: String,
    pub account: String,
}

impl RoomDescriptor {
    /// Room on the default campus area, billed to the default account.
    pub fn new(
        name: &str,
        (building_id, building): (&str, &str),
        (floor_id, floor): (&str, &str),
        (room_id, room): (&str, &str),
    ) -> Self {
        Self {
            name: name.to_string(),
            building_id: building_id.to_string(),
            building: building.to_string(),
            floor_id: floor_id.to_string(),
            floor: floor.to_string(),
            room_id: room_id.to_string(),
            room: room.to_string(),
            area: DEFAULT_AREA.to_string(),
            area_name: DEFAULT_AREA.to_string(),
            account: DEFAULT_ACCOUNT.to_string(),
        }
    }
}

/// Rooms queried on every run, in report order.
pub fn default_rooms() -> Vec<RoomDescriptor> {
    vec![
        RoomDescriptor::new(
            "西苑7号楼 1栋608",
            ("20161008184448464922", "西苑7号楼"),
            ("6", "6层"),
            ("20161009111811827231", "1栋608"),
        ),
        // Further rooms go here.
    ]
}
